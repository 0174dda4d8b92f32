//! The pull source handed to the processor.

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use crate::domain::StepError;
use crate::infrastructure::handoff::Handoff;

/// Blocking byte source that feeds a processor from `step` calls.
///
/// Each read blocks until the step driver has supplied input, the adapter
/// has been closed, or a terminal error exists. From the processor's point
/// of view it is an ordinary blocking reader:
///
/// - input available: copies as much as fits and returns the count
/// - adapter closed: returns `Ok(0)` (end of stream)
/// - any other terminal error: returns it as an `io::Error`
///
/// A zero-length read returns `Ok(0)` immediately.
pub struct PullSource {
    handoff: Arc<Handoff>,
}

impl PullSource {
    pub(crate) fn new(handoff: Arc<Handoff>) -> Self {
        Self { handoff }
    }

    pub(crate) fn pull(&mut self, buf: &mut [u8]) -> Result<usize, StepError> {
        if buf.is_empty() {
            return Ok(0);
        }

        match self.handoff.pull(buf) {
            Err(StepError::Eof) => Ok(0),
            other => other,
        }
    }
}

impl Read for PullSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pull(buf).map_err(io::Error::from)
    }
}

impl fmt::Debug for PullSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullSource").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StepConfig;

    #[test]
    fn test_zero_length_read_does_not_block() {
        let handoff = Arc::new(Handoff::new(StepConfig::default()));
        let mut source = PullSource::new(handoff);

        let mut empty = [0u8; 0];
        assert_eq!(source.read(&mut empty).unwrap(), 0);
    }

    #[test]
    fn test_closed_source_reads_eof() {
        let handoff = Arc::new(Handoff::new(StepConfig::default()));
        handoff.record(StepError::Eof);
        let mut source = PullSource::new(handoff);

        let mut buf = [0u8; 8];
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_failed_source_reads_error() {
        let handoff = Arc::new(Handoff::new(StepConfig::default()));
        handoff.record(StepError::Overflow { limit: 16 });
        let mut source = PullSource::new(handoff);

        let mut buf = [0u8; 8];
        let err = source.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::OutOfMemory);
    }
}
