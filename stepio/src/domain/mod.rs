//! Domain layer - the stepping rules, free of threads and locks.
//!
//! The domain layer contains:
//! - **Entities**: `WorkerState` and the shared `StepState` bookkeeping
//! - **Value Objects**: `StepConfig`
//! - **Ports**: the `Processor` being driven and its `Closable` capability
//! - **Errors**: `StepError`, the sticky terminal condition
//!
//! # Layering
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer (Core)         │
//!     │  - StepState, WorkerState        │
//!     │  - StepConfig                    │
//!     │  - Processor / Closable (ports)  │
//!     └──────────────────────────────────┘
//!                    ▲
//!                    │ driven by
//!                    │
//!     ┌──────────────────────────────────┐
//!     │      Infrastructure Layer        │
//!     │  - Handoff (mutex + condvars)    │
//!     │  - PullSource, worker thread     │
//!     │  - StepAdapter                   │
//!     └──────────────────────────────────┘
//! ```

pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub(crate) use entities::StepState;
pub use entities::WorkerState;
pub use error::StepError;
pub use ports::{Closable, Processor};
pub use value_objects::{StepConfig, StepConfigError, DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_LIMIT};
