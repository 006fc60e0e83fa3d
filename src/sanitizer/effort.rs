use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Model family on which `min` effort is honored by first-party endpoints.
/// Everything else gets `low` instead.
pub const MIN_CAPABLE_MODEL_PREFIX: &str = "gpt-5";

/// Wire values of the `reasoning_effort` request field.
///
/// Membership in this set never implies a value is safe to send everywhere;
/// safety is a property of the (source, value) pair. Strings we have no rule
/// for round-trip unchanged through `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffortValue {
    Auto,
    None,
    Min,
    Low,
    Medium,
    High,
    Max,
    Other(String),
}

impl EffortValue {
    pub fn as_str(&self) -> &str {
        match self {
            EffortValue::Auto => "auto",
            EffortValue::None => "none",
            EffortValue::Min => "min",
            EffortValue::Low => "low",
            EffortValue::Medium => "medium",
            EffortValue::High => "high",
            EffortValue::Max => "max",
            EffortValue::Other(raw) => raw,
        }
    }
}

impl From<&str> for EffortValue {
    fn from(raw: &str) -> Self {
        match raw {
            "auto" => EffortValue::Auto,
            "none" => EffortValue::None,
            "min" => EffortValue::Min,
            "low" => EffortValue::Low,
            "medium" => EffortValue::Medium,
            "high" => EffortValue::High,
            "max" => EffortValue::Max,
            other => EffortValue::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EffortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EffortValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EffortValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EffortValue::from(raw.as_str()))
    }
}

/// Identifier of the upstream endpoint family a request is routed to.
///
/// The set is open: anything that is not a known identifier is carried as
/// `Other` and treated as unsupported rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ApiSource {
    OpenAi,
    AzureOpenAi,
    Other(String),
}

impl ApiSource {
    pub fn as_str(&self) -> &str {
        match self {
            ApiSource::OpenAi => "openai",
            ApiSource::AzureOpenAi => "azure_openai",
            ApiSource::Other(raw) => raw,
        }
    }

    /// First-party or managed-hosting endpoints, where `reasoning_effort`
    /// semantics apply directly instead of going through a remapping gateway.
    pub fn is_first_party(&self) -> bool {
        matches!(self, ApiSource::OpenAi | ApiSource::AzureOpenAi)
    }
}

impl From<&str> for ApiSource {
    fn from(raw: &str) -> Self {
        match raw {
            "openai" => ApiSource::OpenAi,
            "azure_openai" => ApiSource::AzureOpenAi,
            other => ApiSource::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ApiSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ApiSource::from(raw.as_str()))
    }
}

fn default_supported_sources() -> BTreeSet<ApiSource> {
    BTreeSet::from([ApiSource::OpenAi, ApiSource::AzureOpenAi])
}

/// Runtime configuration of the sanitizer. Read as a snapshot on every
/// request; mutated only through the settings endpoint (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    pub enabled: bool,
    /// Sources where `reasoning_effort: "none"` keeps its meaning. Other
    /// sources may remap unknown values (e.g. one gateway turns any
    /// non-`high` value into `low`), so the field is stripped for them.
    pub supported_sources: BTreeSet<ApiSource>,
    /// Effort stamped onto request bodies that do not carry one.
    pub default_effort: Option<EffortValue>,
    pub log_changes: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            supported_sources: default_supported_sources(),
            default_effort: None,
            log_changes: true,
        }
    }
}

impl SanitizerConfig {
    pub fn is_supported(&self, source: &ApiSource) -> bool {
        self.supported_sources.contains(source)
    }

    /// Decides what the upstream endpoint should actually receive for a
    /// requested effort. `None` means the field must not be sent at all.
    pub fn resolve_effort(
        &self,
        requested: &EffortValue,
        source: &ApiSource,
        model: &str,
    ) -> Option<EffortValue> {
        match requested {
            EffortValue::Auto => None,
            EffortValue::None => {
                if self.is_supported(source) {
                    Some(EffortValue::None)
                } else {
                    None
                }
            }
            EffortValue::Min => {
                // Capability-gated: only first-party endpoints honor `min`,
                // and only on the gpt-5 generation family.
                if source.is_first_party() && model.starts_with(MIN_CAPABLE_MODEL_PREFIX) {
                    Some(EffortValue::Min)
                } else {
                    Some(EffortValue::Low)
                }
            }
            EffortValue::Max => Some(EffortValue::High),
            other => Some(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effort_values_round_trip_through_strings() {
        for raw in ["auto", "none", "min", "low", "medium", "high", "max", "turbo"] {
            assert_eq!(EffortValue::from(raw).as_str(), raw);
        }
    }

    #[test]
    fn unknown_sources_are_carried_as_other() {
        assert_eq!(ApiSource::from("openai"), ApiSource::OpenAi);
        assert_eq!(ApiSource::from("azure_openai"), ApiSource::AzureOpenAi);
        assert_eq!(
            ApiSource::from("openrouter"),
            ApiSource::Other("openrouter".to_string())
        );
        assert!(!ApiSource::from("openrouter").is_first_party());
    }

    #[test]
    fn defaults_support_first_party_sources_only() {
        let config = SanitizerConfig::default();
        assert!(config.enabled);
        assert!(config.is_supported(&ApiSource::OpenAi));
        assert!(config.is_supported(&ApiSource::AzureOpenAi));
        assert!(!config.is_supported(&ApiSource::from("openrouter")));
    }

    #[test]
    fn auto_is_never_sent() {
        let config = SanitizerConfig::default();
        for source in ["openai", "azure_openai", "openrouter", "xai"] {
            let resolved =
                config.resolve_effort(&EffortValue::Auto, &ApiSource::from(source), "gpt-5");
            assert_eq!(resolved, None, "auto must resolve to absent for {source}");
        }
    }

    #[test]
    fn none_is_kept_only_on_supported_sources() {
        let config = SanitizerConfig::default();
        assert_eq!(
            config.resolve_effort(&EffortValue::None, &ApiSource::OpenAi, "gpt-5"),
            Some(EffortValue::None)
        );
        assert_eq!(
            config.resolve_effort(&EffortValue::None, &ApiSource::AzureOpenAi, "gpt-5"),
            Some(EffortValue::None)
        );
        assert_eq!(
            config.resolve_effort(&EffortValue::None, &ApiSource::from("openrouter"), "gpt-5"),
            None
        );
    }

    #[test]
    fn min_is_gated_on_first_party_and_model_family() {
        let config = SanitizerConfig::default();
        assert_eq!(
            config.resolve_effort(&EffortValue::Min, &ApiSource::OpenAi, "gpt-5-codex"),
            Some(EffortValue::Min)
        );
        assert_eq!(
            config.resolve_effort(&EffortValue::Min, &ApiSource::OpenAi, "o3-mini"),
            Some(EffortValue::Low)
        );
        assert_eq!(
            config.resolve_effort(&EffortValue::Min, &ApiSource::from("openrouter"), "gpt-5"),
            Some(EffortValue::Low)
        );
    }

    #[test]
    fn max_is_an_alias_for_high_everywhere() {
        let config = SanitizerConfig::default();
        for source in ["openai", "azure_openai", "openrouter"] {
            assert_eq!(
                config.resolve_effort(&EffortValue::Max, &ApiSource::from(source), "gpt-5"),
                Some(EffortValue::High)
            );
        }
    }

    #[test]
    fn values_without_a_rule_pass_through() {
        let config = SanitizerConfig::default();
        assert_eq!(
            config.resolve_effort(&EffortValue::Medium, &ApiSource::from("openrouter"), "x"),
            Some(EffortValue::Medium)
        );
        let raw = EffortValue::from("turbo");
        assert_eq!(
            config.resolve_effort(&raw, &ApiSource::OpenAi, "gpt-5"),
            Some(raw.clone())
        );
    }

    #[test]
    fn config_deserializes_with_defaults_for_missing_fields() {
        let config: SanitizerConfig = toml::from_str("enabled = false").unwrap();
        assert!(!config.enabled);
        assert!(config.is_supported(&ApiSource::OpenAi));
        assert_eq!(config.default_effort, None);
        assert!(config.log_changes);
    }
}
