//! Shared bookkeeping between the step driver and the processing worker.
//!
//! `StepState` holds every mutable field of an adapter. It has no locking of
//! its own: the infrastructure layer keeps it behind a single mutex and all
//! methods here assume that lock is held.

use std::collections::VecDeque;
use std::io::Read;

use crate::domain::{entities::WorkerState, error::StepError, value_objects::StepConfig};

/// State guarded by the adapter's lock.
#[derive(Debug, Default)]
pub(crate) struct StepState {
    /// Input offered by the last step, drained by the pull source.
    pending: VecDeque<u8>,
    /// Output produced since the last step, appended to by the worker only.
    output: Vec<u8>,
    /// Write-once terminal condition.
    terminal: Option<StepError>,
    worker: WorkerState,
    /// Number of times the pull source has parked waiting for input.
    pull_waits: u64,
}

impl StepState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn terminal(&self) -> Option<&StepError> {
        self.terminal.as_ref()
    }

    /// Record a terminal condition unless one is already set.
    ///
    /// Returns `true` if `err` was stored.
    pub(crate) fn record_terminal(&mut self, err: StepError) -> bool {
        if self.terminal.is_some() {
            return false;
        }
        self.terminal = Some(err);
        true
    }

    pub(crate) fn worker(&self) -> WorkerState {
        self.worker
    }

    /// Move the worker to `Terminated`.
    ///
    /// Returns `true` on the first call only.
    pub(crate) fn mark_terminated(&mut self) -> bool {
        if self.worker.is_terminated() {
            return false;
        }
        self.worker = WorkerState::Terminated;
        true
    }

    /// Install `data` as the pending input, unless the adapter is terminal.
    ///
    /// Returns `true` if the input was installed.
    pub(crate) fn offer_input(&mut self, data: &[u8]) -> bool {
        if self.terminal.is_some() {
            return false;
        }
        self.pending.clear();
        self.pending.extend(data);
        true
    }

    pub(crate) fn clear_input(&mut self) {
        self.pending.clear();
    }

    /// Whether a pull must park until input or a terminal condition arrives.
    pub(crate) fn awaits_input(&self) -> bool {
        self.terminal.is_none() && self.pending.is_empty()
    }

    /// Copy as much pending input as fits into `dest`.
    pub(crate) fn take_input(&mut self, dest: &mut [u8]) -> usize {
        // Reading from a VecDeque cannot fail.
        self.pending.read(dest).unwrap_or(0)
    }

    pub(crate) fn pull_waits(&self) -> u64 {
        self.pull_waits
    }

    pub(crate) fn note_pull_wait(&mut self) {
        self.pull_waits = self.pull_waits.wrapping_add(1);
    }

    /// Append freshly produced bytes, enforcing the per-step ceiling.
    ///
    /// On overflow only `bytes` are rejected: output accumulated by earlier
    /// reads stays for the next drain. The overflow error is returned;
    /// nothing is recorded.
    pub(crate) fn append_output(
        &mut self,
        bytes: &[u8],
        config: &StepConfig,
    ) -> Result<(), StepError> {
        if config.exceeds_limit(self.output.len(), bytes.len()) {
            return Err(StepError::Overflow {
                limit: config.output_limit(),
            });
        }
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    /// Swap the accumulated output into `result` and reset the accumulator.
    ///
    /// The previous contents of `result` become the new (empty) accumulator,
    /// so both allocations are reused across steps.
    pub(crate) fn drain_output(&mut self, result: &mut Vec<u8>) {
        core::mem::swap(&mut self.output, result);
        self.output.clear();
    }

    /// The status reported by `close`: plain EOF is success.
    pub(crate) fn close_status(&self) -> Result<(), StepError> {
        match &self.terminal {
            None | Some(StepError::Eof) => Ok(()),
            Some(err) => Err(err.clone()),
        }
    }
}
