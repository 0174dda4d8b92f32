//! Implementations of embedded_io traits for the pull side.
//!
//! Lets processors written against `embedded_io::Read` pull from a
//! [`PullSource`] and be driven by a step adapter.

use std::io;

use embedded_io::{ErrorKind, ErrorType, Read};

use crate::domain::{Processor, StepError};
use crate::infrastructure::pull_source::PullSource;

impl embedded_io::Error for StepError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Overflow { .. } => ErrorKind::OutOfMemory,
            Self::Processor(e) | Self::Construction(e) | Self::Cleanup(e)
                if e.kind() == io::ErrorKind::InvalidData =>
            {
                ErrorKind::InvalidData
            }
            _ => ErrorKind::Other,
        }
    }
}

impl ErrorType for PullSource {
    type Error = StepError;
}

impl Read for PullSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.pull(buf)
    }
}

/// An `embedded_io::Read` used as a processor, without cleanup.
#[derive(Debug)]
pub struct EmbeddedProcessor<R> {
    inner: R,
}

impl<R> EmbeddedProcessor<R> {
    /// Wrap an embedded-io reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Consume the wrapper and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> Processor for EmbeddedProcessor<R>
where
    R: Read,
    R::Error: Send + Sync + 'static,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(|e| {
            let kind = io_kind(embedded_io::Error::kind(&e));
            io::Error::new(kind, e)
        })
    }
}

/// Map an embedded-io error kind to its `std::io` counterpart.
fn io_kind(kind: ErrorKind) -> io::ErrorKind {
    match kind {
        ErrorKind::NotFound => io::ErrorKind::NotFound,
        ErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
        ErrorKind::ConnectionRefused => io::ErrorKind::ConnectionRefused,
        ErrorKind::ConnectionReset => io::ErrorKind::ConnectionReset,
        ErrorKind::ConnectionAborted => io::ErrorKind::ConnectionAborted,
        ErrorKind::NotConnected => io::ErrorKind::NotConnected,
        ErrorKind::AddrInUse => io::ErrorKind::AddrInUse,
        ErrorKind::AddrNotAvailable => io::ErrorKind::AddrNotAvailable,
        ErrorKind::BrokenPipe => io::ErrorKind::BrokenPipe,
        ErrorKind::AlreadyExists => io::ErrorKind::AlreadyExists,
        ErrorKind::InvalidInput => io::ErrorKind::InvalidInput,
        ErrorKind::InvalidData => io::ErrorKind::InvalidData,
        ErrorKind::TimedOut => io::ErrorKind::TimedOut,
        ErrorKind::Interrupted => io::ErrorKind::Interrupted,
        ErrorKind::Unsupported => io::ErrorKind::Unsupported,
        ErrorKind::OutOfMemory => io::ErrorKind::OutOfMemory,
        ErrorKind::WriteZero => io::ErrorKind::WriteZero,
        _ => io::ErrorKind::Other,
    }
}
