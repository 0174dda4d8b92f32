//! Drive a blocking, pull-based byte transformer one chunk at a time.
//!
//! Many transformers (decompressors, block ciphers, incremental parsers) are
//! written as blocking readers: they pull from an upstream source whenever
//! they like and hand back output when they choose to. This crate turns such
//! a transformer into a synchronous step function: give it one chunk of
//! input, get back whatever it produced before it next blocked for more.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! ## Domain Layer (`domain`)
//! Stepping rules with no threads or locks:
//! - **Entities**: `WorkerState` and the shared step bookkeeping
//! - **Value Objects**: `StepConfig`
//! - **Ports**: `Processor` and its optional `Closable` capability
//! - **Errors**: `StepError`
//!
//! ## Adapter Layer (`adapters`)
//! Processors built from existing readers:
//! - **`ReadProcessor`** / **`ClosingProcessor`**: `std::io::Read` based
//! - **`EmbeddedProcessor`**: `embedded_io::Read` based
//!
//! ## Infrastructure Layer (`infrastructure`)
//! The worker thread and the lock/condition-variable handoff:
//! - **`StepAdapter`**: `step` and `close`
//! - **`PullSource`**: the blocking source handed to the processor
//! - **`CloseHandle`**: closes an adapter from another thread
//!
//! # Quick Start
//!
//! ```ignore
//! use flate2::read::ZlibDecoder;
//! use stepio::StepAdapter;
//!
//! let mut adapter = StepAdapter::from_reader(|source| Ok(ZlibDecoder::new(source)));
//!
//! for chunk in network_chunks {
//!     let output = adapter.step(chunk)?;
//!     sink.write_all(output)?;
//! }
//! adapter.close()?;
//! ```
//!
//! # Features
//!
//! - `embedded-io` (default): `embedded_io::Read` for `PullSource` and the
//!   `EmbeddedProcessor` adapter
//! - `std`: enable `embedded-io`'s std integration

#![warn(missing_docs)]

// Core layers
pub mod adapters;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    Closable, Processor, StepConfig, StepConfigError, StepError, WorkerState, DEFAULT_CHUNK_SIZE,
    DEFAULT_OUTPUT_LIMIT,
};

pub use adapters::{ClosingProcessor, ReadProcessor};

#[cfg(feature = "embedded-io")]
pub use adapters::EmbeddedProcessor;

pub use infrastructure::{CloseHandle, PullSource, StepAdapter, WORKER_THREAD_NAME};

#[cfg(feature = "embedded-io")]
pub use embedded_io;
