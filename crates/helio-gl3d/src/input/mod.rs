pub mod interaction;
pub mod queue;
