//! Ports - interfaces the domain expects from the outside world.
//!
//! The only driven port is the blocking processor. The adapter never looks
//! inside it: it calls `read` once per worker iteration and, when the
//! processor is done, asks for its cleanup capability.

mod processor;

pub use processor::{Closable, Processor};
