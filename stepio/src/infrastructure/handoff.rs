//! The handoff monitor: one lock, two condition variables.
//!
//! `Handoff` is the only state shared between the step driver and the
//! processing worker. Every method takes the lock for its own duration and
//! releases it before returning, so no caller ever holds it across a call
//! into the processor.
//!
//! - `input_ready` is waited on by the pull source (worker side)
//! - `output_ready` is waited on by `step` and `close` (driver side)

use parking_lot::{Condvar, Mutex};

use crate::domain::{StepConfig, StepError, StepState};

pub(crate) struct Handoff {
    state: Mutex<StepState>,
    input_ready: Condvar,
    output_ready: Condvar,
    config: StepConfig,
}

impl Handoff {
    pub(crate) fn new(config: StepConfig) -> Self {
        Self {
            state: Mutex::new(StepState::new()),
            input_ready: Condvar::new(),
            output_ready: Condvar::new(),
            config,
        }
    }

    pub(crate) fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Worker side: block until input is pending or the adapter is terminal.
    ///
    /// Each time it parks, the pull wakes the driver: the worker has used up
    /// all input it was given and is about to block again.
    pub(crate) fn pull(&self, dest: &mut [u8]) -> Result<usize, StepError> {
        let mut state = self.state.lock();

        while state.awaits_input() {
            state.note_pull_wait();
            self.output_ready.notify_all();
            self.input_ready.wait(&mut state);
        }

        let n = state.take_input(dest);
        if n > 0 {
            return Ok(n);
        }

        match state.terminal() {
            Some(err) => Err(err.clone()),
            None => Ok(0),
        }
    }

    /// Worker side: append produced bytes under the output ceiling.
    ///
    /// An overflow is recorded as the terminal condition before returning.
    pub(crate) fn deliver(&self, bytes: &[u8]) -> Result<(), StepError> {
        let mut state = self.state.lock();
        let result = state.append_output(bytes, &self.config);
        if let Err(err) = &result {
            state.record_terminal(err.clone());
        }
        result
    }

    /// Record a terminal condition; the first one wins.
    pub(crate) fn record(&self, err: StepError) -> bool {
        self.state.lock().record_terminal(err)
    }

    pub(crate) fn terminal(&self) -> Option<StepError> {
        self.state.lock().terminal().cloned()
    }

    /// Worker side: mark the worker terminated and wake everyone.
    ///
    /// Returns `true` on the first call only.
    pub(crate) fn finish(&self) -> bool {
        let mut state = self.state.lock();
        if !state.mark_terminated() {
            return false;
        }
        // A worker never finishes without a terminal condition.
        state.record_terminal(StepError::Eof);
        self.input_ready.notify_all();
        self.output_ready.notify_all();
        true
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.state.lock().worker().is_terminated()
    }

    /// Driver side: offer `data` and wait for the worker to reach its next
    /// pull boundary or terminate, then drain the output into `result`.
    ///
    /// Returns the terminal condition only when no output was drained.
    pub(crate) fn step(&self, data: &[u8], result: &mut Vec<u8>) -> Option<StepError> {
        let mut state = self.state.lock();

        if state.offer_input(data) {
            self.input_ready.notify_one();
        }

        let seen = state.pull_waits();
        while state.worker().is_running() && state.pull_waits() == seen {
            self.output_ready.wait(&mut state);
        }

        state.drain_output(result);
        if result.is_empty() {
            state.terminal().cloned()
        } else {
            None
        }
    }

    /// Driver side: terminate with EOF (unless already terminal) and wait
    /// for the worker to wind down.
    pub(crate) fn close(&self) -> Result<(), StepError> {
        let mut state = self.state.lock();

        state.record_terminal(StepError::Eof);
        state.clear_input();
        self.input_ready.notify_all();

        while state.worker().is_running() {
            self.output_ready.wait(&mut state);
        }

        state.close_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_pull_returns_terminal_without_waiting() {
        let handoff = Handoff::new(StepConfig::default());
        handoff.record(StepError::Eof);

        let mut buf = [0u8; 4];
        let err = handoff.pull(&mut buf).unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn test_step_after_finish_does_not_wait() {
        let handoff = Handoff::new(StepConfig::default());
        assert!(handoff.finish());
        assert!(!handoff.finish());
        assert!(handoff.is_finished());

        let mut result = Vec::new();
        let err = handoff.step(b"ignored", &mut result);
        assert!(err.is_some_and(|e| e.is_eof()));
        assert!(result.is_empty());
    }

    #[test]
    fn test_step_wakes_on_pull_boundary() {
        let handoff = Arc::new(Handoff::new(StepConfig::default()));

        let worker = {
            let handoff = Arc::clone(&handoff);
            thread::spawn(move || {
                let mut buf = [0u8; 16];
                let n = handoff.pull(&mut buf).unwrap();
                handoff.deliver(&buf[..n]).unwrap();
                // Parks here and releases the step call.
                let n = handoff.pull(&mut buf).unwrap_or(0);
                assert_eq!(n, 0);
                handoff.finish();
            })
        };

        let mut result = Vec::new();
        assert!(handoff.step(b"ping", &mut result).is_none());
        assert_eq!(result, b"ping");

        assert!(handoff.close().is_ok());
        worker.join().unwrap();
    }

    #[test]
    fn test_deliver_records_overflow() {
        let handoff = Handoff::new(StepConfig::new(4, 4).unwrap());
        handoff.deliver(b"abcd").unwrap();

        let err = handoff.deliver(b"e").unwrap_err();
        assert!(err.is_overflow());
        assert!(handoff.terminal().is_some_and(|e| e.is_overflow()));
    }
}
