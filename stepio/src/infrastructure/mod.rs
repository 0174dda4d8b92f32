//! Infrastructure layer - the threads and locks behind stepping.
//!
//! This module wires the domain state to real synchronization primitives:
//! - `Handoff`: the single mutex and the two condition variables
//! - [`PullSource`]: the blocking source the processor pulls from
//! - the worker thread that owns and drives the processor
//! - [`StepAdapter`] and [`CloseHandle`]: the driver-side API

mod handoff;
mod pull_source;
mod step_adapter;
mod worker;

#[cfg(feature = "embedded-io")]
pub(crate) mod embedded_io_impl;

pub use pull_source::PullSource;
pub use step_adapter::{CloseHandle, StepAdapter};
pub use worker::WORKER_THREAD_NAME;
