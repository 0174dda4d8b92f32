//! Step adapter configuration value object.

/// Default size of the buffer the worker hands to each processor read.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Default ceiling on the output a processor may produce within one step (1 MiB).
pub const DEFAULT_OUTPUT_LIMIT: usize = 1024 * 1024;

/// Configuration for a step adapter.
///
/// Defines:
/// - The chunk size used for each call into the processor
/// - The output ceiling for a single step
///
/// When a single processor read would push the output accumulated since the
/// last step past the ceiling, that read's bytes are discarded and the
/// adapter terminates with an overflow error. Output from earlier reads is
/// still returned. The ceiling is not a truncation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepConfig {
    chunk_size: usize,
    output_limit: usize,
}

impl StepConfig {
    /// Create a new step configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepio::StepConfig;
    ///
    /// let config = StepConfig::new(4096, 64 * 1024).unwrap();
    /// assert_eq!(config.chunk_size(), 4096);
    /// assert_eq!(config.output_limit(), 64 * 1024);
    /// ```
    pub const fn new(chunk_size: usize, output_limit: usize) -> Result<Self, StepConfigError> {
        if chunk_size == 0 {
            return Err(StepConfigError::ZeroChunkSize);
        }
        if output_limit == 0 {
            return Err(StepConfigError::ZeroOutputLimit);
        }

        Ok(Self {
            chunk_size,
            output_limit,
        })
    }

    /// Return a copy with a different chunk size.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is zero.
    pub const fn with_chunk_size(self, chunk_size: usize) -> Result<Self, StepConfigError> {
        Self::new(chunk_size, self.output_limit)
    }

    /// Return a copy with a different output ceiling.
    ///
    /// # Errors
    ///
    /// Returns an error if `output_limit` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepio::StepConfig;
    ///
    /// let config = StepConfig::default().with_output_limit(512).unwrap();
    /// assert_eq!(config.output_limit(), 512);
    /// assert_eq!(config.chunk_size(), stepio::DEFAULT_CHUNK_SIZE);
    /// ```
    pub const fn with_output_limit(self, output_limit: usize) -> Result<Self, StepConfigError> {
        Self::new(self.chunk_size, output_limit)
    }

    /// Get the processor read size in bytes.
    #[inline]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the per-step output ceiling in bytes.
    #[inline]
    pub const fn output_limit(&self) -> usize {
        self.output_limit
    }

    /// Check whether appending `incoming` bytes to `buffered` would break the ceiling.
    #[inline]
    pub const fn exceeds_limit(&self, buffered: usize, incoming: usize) -> bool {
        buffered.saturating_add(incoming) > self.output_limit
    }
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_limit: DEFAULT_OUTPUT_LIMIT,
        }
    }
}

/// Errors that can occur when creating a StepConfig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepConfigError {
    /// Chunk size is zero.
    ZeroChunkSize,
    /// Output limit is zero.
    ZeroOutputLimit,
}

impl core::fmt::Display for StepConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroChunkSize => write!(f, "Chunk size cannot be zero"),
            Self::ZeroOutputLimit => write!(f, "Output limit cannot be zero"),
        }
    }
}

impl core::error::Error for StepConfigError {}
