//! Headless demo driver: runs a default avatar through a short scripted
//! conversation and logs what the engine is doing.
//!
//! Usage: `marionette [seconds]` (default 12). Set `RUST_LOG=debug` for
//! per-transition detail.

use glam::Vec3;
use marionette::behavior::CharacterState;
use marionette::engine::{EngineCommand, MotionEngine};
use marionette::expression::ExpressionTarget;
use marionette::options::Options;
use marionette::profile::CharacterProfile;
use marionette::rig::{ClipInfo, JointPose, SampleWindow, SkeletalRig};
use marionette::util::frame_timing::FrameTiming;

const TARGET_FPS: u32 = 60;

fn demo_rig(profile: &CharacterProfile) -> SkeletalRig {
    let mut rig = SkeletalRig::new("head")
        .with_joint("hair_front", JointPose::IDENTITY)
        .with_joint("ribbon", JointPose::IDENTITY)
        .with_clip("wave", ClipInfo::once(2.5))
        .with_clip("nod", ClipInfo::once(1.2));
    for pool in &profile.pools {
        for clip in &pool.clips {
            rig = rig.with_clip(&clip.clip, ClipInfo::looping(4.0));
        }
    }
    for name in ["happy", "relaxed", "surprised", "mouth_open"] {
        rig = rig.with_expression(name);
    }
    rig
}

/// Commands fired once the clock passes their timestamp.
fn script() -> Vec<(f64, EngineCommand)> {
    vec![
        (1.0, EngineCommand::TriggerGesture { name: "wave".to_owned() }),
        (2.5, EngineCommand::SetListening { active: true }),
        (4.0, EngineCommand::SetListening { active: false }),
        (
            6.0,
            EngineCommand::SetState {
                state: CharacterState::Thinking,
                force: false,
            },
        ),
        (
            6.5,
            EngineCommand::ApplyImpulse {
                joint: "hair_front".to_owned(),
                direction: Vec3::X,
                strength: 1.5,
            },
        ),
        (8.0, EngineCommand::SetSpeaking { active: true }),
        (
            8.2,
            EngineCommand::PlayEmotion {
                targets: vec![ExpressionTarget::new("happy", 0.8)],
            },
        ),
        (10.5, EngineCommand::SetSpeaking { active: false }),
    ]
}

fn main() {
    env_logger::init();

    let seconds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .unwrap_or(12.0);

    let profile = CharacterProfile::default();
    let rig = demo_rig(&profile);
    let mut engine = MotionEngine::new(rig, profile, Options::default());

    let window = SampleWindow::new();
    engine.set_audio_source(Some(Box::new(window.clone())));

    let mut script = script().into_iter().peekable();
    let mut timing = FrameTiming::new(TARGET_FPS);
    let mut frame: u64 = 0;
    let mut last_report = 0.0;

    while engine.clock() < seconds {
        std::thread::sleep(timing.time_until_next());
        let dt = timing.end_frame();

        while let Some((_, command)) =
            script.next_if(|(at, _)| *at <= engine.clock())
        {
            log::info!("command: {command:?}");
            engine.execute(command);
        }

        // Synthetic speech envelope while speaking
        let info = engine.debug_info();
        if info.is_speaking {
            let level = 0.25 * (1.0 + (engine.clock() * 9.0).sin()) as f32;
            window.write(&[level, -level * 0.8]);
        } else {
            window.clear();
        }

        engine.update(dt);
        frame += 1;

        if engine.clock() - last_report >= 1.0 {
            last_report = engine.clock();
            log::info!(
                "[{:5.1}s {:3.0} fps] {}",
                engine.clock(),
                timing.fps(),
                engine.debug_info()
            );
        }
    }
    log::info!("done after {frame} frames");
}
