//! The public stepping interface.

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{debug, trace, warn};

use crate::adapters::ReadProcessor;
use crate::domain::{Processor, StepConfig, StepError};
use crate::infrastructure::{handoff::Handoff, pull_source::PullSource, worker};

/// Turns a blocking, pull-based processor into a synchronous `step` function.
///
/// Construction starts a worker thread that builds the processor from the
/// given factory and drives it. Each [`step`](Self::step) call offers one
/// chunk of input and returns everything the processor produced before it
/// next blocked for more input than was available, or terminated.
///
/// Once a terminal condition is recorded it is permanent: every later step
/// returns no data and that same condition. Construction failures surface
/// the same way, through the first `step` or `close`.
///
/// Dropping the adapter closes it and joins the worker thread.
///
/// # Examples
///
/// ```
/// use stepio::StepAdapter;
///
/// // The pull source itself is the simplest processor: it echoes its input.
/// let mut adapter = StepAdapter::from_reader(|source| Ok(source));
///
/// assert_eq!(adapter.step(b"hello").unwrap(), b"hello");
/// assert_eq!(adapter.step(b"").unwrap(), b"");
///
/// adapter.close().unwrap();
/// assert!(adapter.step(b"more").unwrap_err().is_eof());
/// ```
pub struct StepAdapter {
    handoff: Arc<Handoff>,
    /// Reused across steps; the slice returned by `step` borrows it.
    result: Vec<u8>,
    worker: Option<JoinHandle<()>>,
}

impl StepAdapter {
    /// Create an adapter with the default configuration.
    ///
    /// `factory` runs on the worker thread and receives the [`PullSource`]
    /// the processor must read its input from.
    pub fn new<F, P>(factory: F) -> Self
    where
        F: FnOnce(PullSource) -> io::Result<P> + Send + 'static,
        P: Processor + 'static,
    {
        Self::with_config(StepConfig::default(), factory)
    }

    /// Create an adapter with an explicit configuration.
    pub fn with_config<F, P>(config: StepConfig, factory: F) -> Self
    where
        F: FnOnce(PullSource) -> io::Result<P> + Send + 'static,
        P: Processor + 'static,
    {
        let handoff = Arc::new(Handoff::new(config));

        let worker = match worker::spawn(Arc::clone(&handoff), factory) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("failed to spawn stepio worker: {}", err);
                handoff.record(StepError::Construction(Arc::new(err)));
                handoff.finish();
                None
            }
        };

        Self {
            handoff,
            result: Vec::new(),
            worker,
        }
    }

    /// Create an adapter around any blocking reader, with the default configuration.
    ///
    /// Readers have no cleanup capability; use [`ClosingProcessor`] through
    /// [`new`](Self::new) for one that does.
    ///
    /// [`ClosingProcessor`]: crate::ClosingProcessor
    pub fn from_reader<F, R>(factory: F) -> Self
    where
        F: FnOnce(PullSource) -> io::Result<R> + Send + 'static,
        R: Read + 'static,
    {
        Self::from_reader_with_config(StepConfig::default(), factory)
    }

    /// Create an adapter around any blocking reader with an explicit configuration.
    pub fn from_reader_with_config<F, R>(config: StepConfig, factory: F) -> Self
    where
        F: FnOnce(PullSource) -> io::Result<R> + Send + 'static,
        R: Read + 'static,
    {
        Self::with_config(config, move |source| factory(source).map(ReadProcessor::new))
    }

    /// Feed `data` to the processor and return the output it made available.
    ///
    /// Blocks until the processor has consumed all of `data` and asked for
    /// more, or has terminated. An empty `data` is a probe: it still waits
    /// for the processor to reach its next pull.
    ///
    /// Returns:
    /// - `Ok(bytes)` with the output produced during this step, possibly empty
    /// - `Err(condition)` when nothing was produced and the adapter is
    ///   terminal; [`StepError::Eof`] marks ordinary completion
    ///
    /// The returned slice borrows a buffer that the next call reuses.
    pub fn step(&mut self, data: &[u8]) -> Result<&[u8], StepError> {
        match self.handoff.step(data, &mut self.result) {
            Some(err) => {
                trace!("step of {} bytes ended: {}", data.len(), err);
                Err(err)
            }
            None => {
                trace!("step of {} bytes produced {} bytes", data.len(), self.result.len());
                Ok(&self.result)
            }
        }
    }

    /// Close the adapter and wait for the worker to wind down.
    ///
    /// Any pending input is dropped and the processor observes end of input
    /// on its next pull. Returns `Ok(())` if the terminal condition is plain
    /// EOF, otherwise the recorded error. Calling it again returns the same
    /// status without blocking.
    ///
    /// Output the processor produces while winding down is kept for the
    /// next `step` call.
    pub fn close(&self) -> Result<(), StepError> {
        self.handoff.close()
    }

    /// A handle that can close this adapter from another thread.
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            handoff: Arc::clone(&self.handoff),
        }
    }

    /// Check whether the worker has terminated.
    pub fn is_finished(&self) -> bool {
        self.handoff.is_finished()
    }

    /// The configuration this adapter was built with.
    pub fn config(&self) -> StepConfig {
        *self.handoff.config()
    }
}

impl Drop for StepAdapter {
    fn drop(&mut self) {
        if let Err(err) = self.handoff.close() {
            debug!("stepio adapter dropped with terminal error: {}", err);
        }
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                debug!("stepio worker exited by panic");
            }
        }
    }
}

impl fmt::Debug for StepAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepAdapter")
            .field("config", self.handoff.config())
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

/// Closes a [`StepAdapter`] from any thread.
///
/// Closing through a handle has the same effect and result as
/// [`StepAdapter::close`], and releases a `step` call blocked on another
/// thread.
#[derive(Clone)]
pub struct CloseHandle {
    handoff: Arc<Handoff>,
}

impl CloseHandle {
    /// Close the adapter and wait for the worker to wind down.
    pub fn close(&self) -> Result<(), StepError> {
        self.handoff.close()
    }

    /// Check whether the worker has terminated.
    pub fn is_finished(&self) -> bool {
        self.handoff.is_finished()
    }
}

impl fmt::Debug for CloseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_steps() {
        let mut adapter = StepAdapter::from_reader(Ok);

        assert_eq!(adapter.step(b"abc").unwrap(), b"abc");
        assert_eq!(adapter.step(b"defg").unwrap(), b"defg");
        assert!(adapter.step(b"").unwrap().is_empty());
        assert!(!adapter.is_finished());

        adapter.close().unwrap();
        assert!(adapter.is_finished());
    }

    #[test]
    fn test_config_is_kept() {
        let config = StepConfig::new(16, 256).unwrap();
        let adapter = StepAdapter::from_reader_with_config(config, Ok);
        assert_eq!(adapter.config(), config);
    }

    #[test]
    fn test_close_before_any_step() {
        let mut adapter = StepAdapter::from_reader(Ok);
        assert!(adapter.close().is_ok());
        assert!(adapter.close().is_ok());
        assert!(adapter.step(b"x").unwrap_err().is_eof());
    }

    #[test]
    fn test_close_handle_reports_same_status() {
        let adapter = StepAdapter::from_reader(Ok);
        let handle = adapter.close_handle();

        assert!(handle.close().is_ok());
        assert!(handle.is_finished());
        assert!(adapter.close().is_ok());
    }

    #[test]
    fn test_drop_without_close_joins_worker() {
        let mut adapter = StepAdapter::from_reader(Ok);
        assert_eq!(adapter.step(b"data").unwrap(), b"data");
        drop(adapter);
    }
}
