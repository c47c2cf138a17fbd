mod errors;
mod exercise;
mod lesson;
mod steps;

pub use errors::DomainError;
pub use exercise::ExerciseDef;
pub use lesson::{Lesson, Section};
// Re-export the flattened-flow model so engine crates can consume it
pub use steps::{flatten, flow_fingerprint, FlowStep, StepContent, StepKind};
