//! Secondary-motion springs.

mod solver;
mod spring;

pub use solver::{SpringBody, SpringSolver, SpringState};
pub use spring::{LinearSpring, RotationalSpring, ScalarSpring, SpringCoefficients};
