//! Terminal conditions of a step adapter.
//!
//! A `StepError` is recorded at most once per adapter and then returned from
//! every later `step` and `close` call, so it must be cheap to clone. Errors
//! coming from the processor are shared through an `Arc`.

use core::fmt;
use std::io;
use std::sync::Arc;

/// The sticky end condition of a step adapter.
///
/// `Eof` is the ordinary completion marker; every other variant is a failure.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum StepError {
    /// The processor finished, or the adapter was closed.
    Eof,

    /// The processor factory failed. No input was ever pulled.
    Construction(Arc<io::Error>),

    /// The processor failed while producing output.
    Processor(Arc<io::Error>),

    /// The processor's cleanup capability failed.
    Cleanup(Arc<io::Error>),

    /// The processor produced more than `limit` bytes before asking for
    /// more input. The read that crossed the ceiling was discarded.
    Overflow {
        /// The configured per-step output ceiling.
        limit: usize,
    },

    /// The processor panicked on the worker thread.
    WorkerPanicked,
}

impl StepError {
    /// Check if this is the plain end-of-input marker.
    #[inline]
    pub const fn is_eof(&self) -> bool {
        matches!(self, StepError::Eof)
    }

    /// Check if this is the output ceiling error.
    #[inline]
    pub const fn is_overflow(&self) -> bool {
        matches!(self, StepError::Overflow { .. })
    }

    /// The underlying I/O error, for variants that carry one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Construction(e) | Self::Processor(e) | Self::Cleanup(e) => Some(e),
            _ => None,
        }
    }

    /// The `std::io::ErrorKind` this condition maps to.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Eof => io::ErrorKind::UnexpectedEof,
            Self::Overflow { .. } => io::ErrorKind::OutOfMemory,
            Self::WorkerPanicked => io::ErrorKind::Other,
            Self::Construction(e) | Self::Processor(e) | Self::Cleanup(e) => e.kind(),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "EOF"),
            Self::Construction(e) => write!(f, "Processor construction failed: {}", e),
            Self::Processor(e) => write!(f, "Processor error: {}", e),
            Self::Cleanup(e) => write!(f, "Processor cleanup failed: {}", e),
            Self::Overflow { limit } => {
                write!(f, "Excessive data on single step (limit {} bytes)", limit)
            }
            Self::WorkerPanicked => write!(f, "Processor panicked on the worker thread"),
        }
    }
}

impl core::error::Error for StepError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Construction(e) | Self::Processor(e) | Self::Cleanup(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<StepError> for io::Error {
    fn from(err: StepError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_display() {
        assert_eq!(StepError::Eof.to_string(), "EOF");
        assert!(StepError::Eof.is_eof());
        assert!(!StepError::Eof.is_overflow());
    }

    #[test]
    fn test_overflow_display() {
        let err = StepError::Overflow { limit: 1024 };
        let msg = err.to_string();
        assert!(msg.contains("Excessive data"));
        assert!(msg.contains("1024"));
        assert!(err.is_overflow());
        assert_eq!(err.kind(), io::ErrorKind::OutOfMemory);
    }

    #[test]
    fn test_processor_error_keeps_source() {
        let inner = io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream");
        let err = StepError::Processor(Arc::new(inner));

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("corrupt deflate stream"));
        assert!(core::error::Error::source(&err).is_some());
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(io::ErrorKind::InvalidData)
        );
    }

    #[test]
    fn test_clone_shares_io_error() {
        let err = StepError::Cleanup(Arc::new(io::Error::other("close failed")));
        let copy = err.clone();

        match (&err, &copy) {
            (StepError::Cleanup(a), StepError::Cleanup(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("Expected Cleanup variant"),
        }
    }

    #[test]
    fn test_into_io_error() {
        let io_err: io::Error = StepError::Eof.into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);

        let io_err: io::Error = StepError::Overflow { limit: 8 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::OutOfMemory);
    }
}
