//! Domain entities - the mutable state shared by the step driver and the worker.

mod step_state;
mod worker_state;

pub(crate) use step_state::StepState;
pub use worker_state::WorkerState;
