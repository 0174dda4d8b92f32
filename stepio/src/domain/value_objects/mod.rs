//! Value objects - immutable, validated configuration.

mod step_config;

pub use step_config::{StepConfig, StepConfigError, DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_LIMIT};
