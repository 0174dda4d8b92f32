//! The processing worker.
//!
//! One thread per adapter. It builds the processor, then calls its `read`
//! in a loop and hands everything produced to the handoff, until the
//! processor finishes, fails, overflows the output ceiling, or observes the
//! adapter being closed through its pull source.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, trace, warn};

use crate::domain::{Processor, StepError};
use crate::infrastructure::{handoff::Handoff, pull_source::PullSource};

/// Name given to every worker thread.
pub const WORKER_THREAD_NAME: &str = "stepio-worker";

/// Start the worker thread for `handoff`.
pub(crate) fn spawn<F, P>(handoff: Arc<Handoff>, factory: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce(PullSource) -> io::Result<P> + Send + 'static,
    P: Processor + 'static,
{
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.into())
        .spawn(move || run(handoff, factory))
}

/// Marks the worker terminated however `run` exits, including by panic.
struct FinishGuard<'a> {
    handoff: &'a Handoff,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            warn!("processor panicked, terminating stepio worker");
            self.handoff.record(StepError::WorkerPanicked);
        }
        self.handoff.finish();
    }
}

fn run<F, P>(handoff: Arc<Handoff>, factory: F)
where
    F: FnOnce(PullSource) -> io::Result<P>,
    P: Processor + 'static,
{
    let _finish = FinishGuard { handoff: &handoff };
    debug!("stepio worker started");

    let processor = match factory(PullSource::new(Arc::clone(&handoff))) {
        Ok(processor) => processor,
        Err(err) => {
            warn!("processor construction failed: {}", err);
            handoff.record(StepError::Construction(Arc::new(err)));
            return;
        }
    };

    drive(&handoff, processor);

    if let Some(err) = handoff.terminal() {
        debug!("stepio worker terminated: {}", err);
    }
}

/// Read from the processor until a terminal condition, then run its cleanup.
///
/// The processor is dropped before returning, so it is gone by the time the
/// worker is marked terminated.
fn drive<P: Processor>(handoff: &Handoff, mut processor: P) {
    let mut chunk = vec![0u8; handoff.config().chunk_size()];

    let end = loop {
        match processor.read(&mut chunk) {
            Ok(0) => break StepError::Eof,
            Ok(n) if n > chunk.len() => {
                break StepError::Processor(Arc::new(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "processor reported more bytes than its buffer holds",
                )));
            }
            Ok(n) => {
                trace!("processor produced {} bytes", n);
                if let Err(err) = handoff.deliver(&chunk[..n]) {
                    warn!("{}, discarding {} bytes", err, n);
                    break err;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => break StepError::Processor(Arc::new(err)),
        }
    };
    handoff.record(end);

    if let Some(closable) = processor.closable() {
        debug!("running processor cleanup");
        if let Err(err) = closable.close() {
            // The loop above always records a terminal condition first.
            if !handoff.record(StepError::Cleanup(Arc::new(err))) {
                debug!("processor cleanup failed after the terminal condition was set");
            }
        }
    }
}
