use serde_json::Value;

use super::effort::{ApiSource, EffortValue, SanitizerConfig};

pub const REASONING_EFFORT_FIELD: &str = "reasoning_effort";

/// What happened to the `reasoning_effort` field during one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffortOutcome {
    pub before: Option<EffortValue>,
    pub after: Option<EffortValue>,
}

impl EffortOutcome {
    fn untouched(value: Option<EffortValue>) -> Self {
        Self {
            before: value.clone(),
            after: value,
        }
    }

    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    pub fn disposition(&self) -> &'static str {
        match (&self.before, &self.after) {
            (Some(b), Some(a)) if b != a => "rewritten",
            (Some(_), None) => "removed",
            (None, Some(_)) => "stamped",
            _ => "unchanged",
        }
    }
}

fn current_effort(body: &Value) -> Option<EffortValue> {
    body.get(REASONING_EFFORT_FIELD)?
        .as_str()
        .map(EffortValue::from)
}

/// Strips `reasoning_effort` from `body` when the stored value must not reach
/// `source` (it resolves to "do not send"). Every other key is left exactly
/// as it was, in its original position. Non-object bodies and non-string
/// field values pass through unchanged; this function never fails and
/// applying it twice equals applying it once.
pub fn sanitize(body: &mut Value, source: &ApiSource, config: &SanitizerConfig) -> EffortOutcome {
    let current = current_effort(body);
    if !config.enabled {
        return EffortOutcome::untouched(current);
    }
    let Some(value) = current else {
        return EffortOutcome::untouched(None);
    };

    let must_remove = match &value {
        EffortValue::Auto => true,
        EffortValue::None => !config.is_supported(source),
        _ => false,
    };
    if !must_remove {
        return EffortOutcome::untouched(Some(value));
    }

    let Some(map) = body.as_object_mut() else {
        return EffortOutcome::untouched(Some(value));
    };
    map.shift_remove(REASONING_EFFORT_FIELD);
    if config.log_changes {
        let reason = match value {
            EffortValue::Auto => "auto delegates to the provider default",
            _ => "the target source does not support this value",
        };
        tracing::warn!(source = %source, value = %value, reason, "removed reasoning_effort from outgoing request");
    }
    EffortOutcome {
        before: Some(value),
        after: None,
    }
}

/// Generation-pipeline step: rewrites the stored `reasoning_effort` to the
/// value the target source should actually receive, removing the field when
/// nothing should be sent. Bodies without the field get the configured
/// default effort stamped first (when one is set and the sanitizer is
/// enabled). Idempotent: every resolved value is a fixed point of the rules.
pub fn apply_effort_resolution(
    body: &mut Value,
    source: &ApiSource,
    model: &str,
    config: &SanitizerConfig,
) -> EffortOutcome {
    let Some(map) = body.as_object_mut() else {
        return EffortOutcome::untouched(None);
    };

    let before = map
        .get(REASONING_EFFORT_FIELD)
        .and_then(Value::as_str)
        .map(EffortValue::from);

    let requested = match &before {
        Some(value) => value.clone(),
        None => {
            if map.contains_key(REASONING_EFFORT_FIELD) {
                // Present but not a string: not ours to interpret.
                return EffortOutcome::untouched(None);
            }
            match (&config.default_effort, config.enabled) {
                (Some(default), true) => default.clone(),
                _ => return EffortOutcome::untouched(None),
            }
        }
    };

    let after = config.resolve_effort(&requested, source, model);
    match &after {
        Some(resolved) => {
            map.insert(
                REASONING_EFFORT_FIELD.to_string(),
                Value::String(resolved.to_string()),
            );
        }
        None => {
            map.shift_remove(REASONING_EFFORT_FIELD);
        }
    }

    let outcome = EffortOutcome { before, after };
    if config.log_changes && outcome.changed() {
        tracing::debug!(
            source = %source,
            model,
            disposition = outcome.disposition(),
            "resolved reasoning_effort for upstream request"
        );
    }
    outcome
}

/// Transport-level hook: parse, sanitize, re-serialize. Anything that is not
/// a JSON body — and any body the sanitizer leaves alone — is forwarded
/// byte-for-byte. Never fails.
pub fn sanitize_serialized(bytes: Vec<u8>, source: &ApiSource, config: &SanitizerConfig) -> Vec<u8> {
    let Ok(mut value) = serde_json::from_slice::<Value>(&bytes) else {
        return bytes;
    };
    let outcome = sanitize(&mut value, source, config);
    if !outcome.changed() {
        return bytes;
    }
    match serde_json::to_vec(&value) {
        Ok(out) => out,
        Err(_) => bytes,
    }
}
