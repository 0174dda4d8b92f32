//! Adapter layer - turns common reader types into [`Processor`]s.
//!
//! [`Processor`]: crate::Processor
//!
//! # Available Adapters
//!
//! - **`ReadProcessor`**: any `std::io::Read`, no cleanup
//! - **`ClosingProcessor`**: any `std::io::Read + Closable`, cleanup on termination
//! - **`EmbeddedProcessor`**: any `embedded_io::Read` (requires `embedded-io`)

mod read_processor;

pub use read_processor::{ClosingProcessor, ReadProcessor};

#[cfg(feature = "embedded-io")]
pub use crate::infrastructure::embedded_io_impl::EmbeddedProcessor;
