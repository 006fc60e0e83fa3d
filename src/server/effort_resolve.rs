use serde_json::Value;

use crate::sanitizer::{
    apply_effort_resolution, sanitize, ApiSource, EffortOutcome, SanitizerConfig,
};

/// High-level interception point: runs in the request pipeline before the
/// body is handed to the transport client (which applies its own sanitize
/// pass on the serialized bytes). Both passes are idempotent, so firing both
/// for one request changes nothing over firing either once.
pub fn apply_effort_rules(
    body: &mut Value,
    source: &ApiSource,
    model: &str,
    config: &SanitizerConfig,
) -> EffortOutcome {
    let resolved = apply_effort_resolution(body, source, model, config);
    let sanitized = sanitize(body, source, config);
    EffortOutcome {
        before: resolved.before,
        after: sanitized.after,
    }
}
