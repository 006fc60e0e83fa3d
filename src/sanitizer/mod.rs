pub mod effort;
pub mod sanitize;

pub use effort::{ApiSource, EffortValue, SanitizerConfig, MIN_CAPABLE_MODEL_PREFIX};
pub use sanitize::{
    apply_effort_resolution, sanitize, sanitize_serialized, EffortOutcome, REASONING_EFFORT_FIELD,
};
