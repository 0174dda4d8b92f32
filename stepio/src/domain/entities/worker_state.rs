//! Worker lifecycle state.

/// The state of the processing worker.
///
/// The worker transitions exactly once:
/// - Running: the worker owns the processor and may still touch shared state
/// - Terminated: the worker has recorded a terminal condition and will never
///   touch shared state again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// The worker is pulling input and producing output.
    Running,
    /// The worker has wound down.
    Terminated,
}

impl WorkerState {
    /// Check if the worker is still running.
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self, WorkerState::Running)
    }

    /// Check if the worker has terminated.
    #[inline]
    pub const fn is_terminated(&self) -> bool {
        matches!(self, WorkerState::Terminated)
    }
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::Running
    }
}
