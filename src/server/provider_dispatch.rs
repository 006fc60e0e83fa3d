use crate::config::{Provider, Settings};
use crate::error::GatewayError;

/// Splits `provider/model` into a configured provider prefix and the model
/// name the upstream actually knows.
///
/// 示例：
/// - "openai/gpt-5-codex" -> provider "openai", model "gpt-5-codex"
/// - "gpt-5-codex" -> no prefix, model "gpt-5-codex"
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedModel {
    pub provider_name: Option<String>,
    pub model_name: String,
}

impl ParsedModel {
    pub fn parse(model: &str) -> Self {
        if let Some(slash_pos) = model.find('/') {
            Self {
                provider_name: Some(model[..slash_pos].to_string()),
                model_name: model[slash_pos + 1..].to_string(),
            }
        } else {
            Self {
                provider_name: None,
                model_name: model.to_string(),
            }
        }
    }
}

/// Decides which configured provider a request goes to. The active source is
/// derived from this per call, never cached across requests.
///
/// A `provider/` prefix only counts when it names a configured provider;
/// otherwise the whole string is the model name (upstream model ids can
/// contain slashes themselves).
pub fn select_provider(
    settings: &Settings,
    model: &str,
) -> Result<(Provider, ParsedModel), GatewayError> {
    let parsed = ParsedModel::parse(model);

    if let Some(provider_name) = &parsed.provider_name {
        if let Some(provider) = settings.providers.get(provider_name) {
            return Ok((provider.clone(), parsed));
        }
    }

    let unprefixed = ParsedModel {
        provider_name: None,
        model_name: model.to_string(),
    };

    if let Some(name) = &settings.default_provider {
        let provider = settings.providers.get(name).ok_or_else(|| {
            GatewayError::Config(format!("default provider '{}' is not configured", name))
        })?;
        return Ok((provider.clone(), unprefixed));
    }

    if settings.providers.len() == 1 {
        if let Some(provider) = settings.providers.values().next() {
            return Ok((provider.clone(), unprefixed));
        }
    }

    Err(GatewayError::Routing(
        "no provider matches the requested model and no default provider is configured".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::ApiSource;
    use std::collections::HashMap;

    fn provider(name: &str, source: &str) -> Provider {
        Provider {
            name: name.to_string(),
            source: ApiSource::from(source),
            base_url: format!("https://{}.example.com", name),
            api_keys: vec!["key".to_string()],
            models_endpoint: None,
        }
    }

    fn settings(providers: Vec<Provider>, default: Option<&str>) -> Settings {
        let mut map = HashMap::new();
        for p in providers {
            map.insert(p.name.clone(), p);
        }
        Settings {
            default_provider: default.map(str::to_string),
            providers: map,
            ..Settings::default()
        }
    }

    #[test]
    fn parse_splits_on_first_slash() {
        let parsed = ParsedModel::parse("openrouter/deepseek/deepseek-chat");
        assert_eq!(parsed.provider_name.as_deref(), Some("openrouter"));
        assert_eq!(parsed.model_name, "deepseek/deepseek-chat");
    }

    #[test]
    fn parse_without_prefix() {
        let parsed = ParsedModel::parse("gpt-5-codex");
        assert_eq!(parsed.provider_name, None);
        assert_eq!(parsed.model_name, "gpt-5-codex");
    }

    #[test]
    fn prefixed_model_selects_that_provider() {
        let s = settings(
            vec![provider("openai", "openai"), provider("router", "openrouter")],
            None,
        );
        let (p, parsed) = select_provider(&s, "router/some-model").unwrap();
        assert_eq!(p.name, "router");
        assert_eq!(parsed.model_name, "some-model");
    }

    #[test]
    fn unknown_prefix_falls_back_to_default_with_full_model_name() {
        let s = settings(
            vec![provider("openai", "openai"), provider("router", "openrouter")],
            Some("router"),
        );
        let (p, parsed) = select_provider(&s, "deepseek/deepseek-chat").unwrap();
        assert_eq!(p.name, "router");
        assert_eq!(parsed.model_name, "deepseek/deepseek-chat");
    }

    #[test]
    fn single_provider_needs_no_default() {
        let s = settings(vec![provider("openai", "openai")], None);
        let (p, _) = select_provider(&s, "gpt-5").unwrap();
        assert_eq!(p.name, "openai");
    }

    #[test]
    fn ambiguous_routing_is_an_error() {
        let s = settings(
            vec![provider("openai", "openai"), provider("router", "openrouter")],
            None,
        );
        let err = select_provider(&s, "gpt-5").unwrap_err();
        assert!(matches!(err, GatewayError::Routing(_)));
    }

    #[test]
    fn missing_default_provider_is_a_config_error() {
        let s = settings(vec![provider("openai", "openai")], Some("gone"));
        let err = select_provider(&s, "gpt-5").unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }
}
