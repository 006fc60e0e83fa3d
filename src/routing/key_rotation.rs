use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::{KeyStrategy, Provider};
use crate::error::GatewayError;

/// Picks an API key for a provider according to the configured strategy.
/// Round-robin counters are tracked per provider name.
pub struct KeyRotation {
    strategy: KeyStrategy,
    counters: Mutex<HashMap<String, usize>>,
}

impl KeyRotation {
    pub fn new(strategy: KeyStrategy) -> Self {
        Self {
            strategy,
            counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn select(&self, provider: &Provider) -> Result<String, GatewayError> {
        let keys = &provider.api_keys;
        if keys.is_empty() {
            return Err(GatewayError::Routing(format!(
                "no API keys configured for provider '{}'",
                provider.name
            )));
        }

        let index = match self.strategy {
            KeyStrategy::FirstAvailable => 0,
            KeyStrategy::Random => rand::rng().random_range(0..keys.len()),
            KeyStrategy::RoundRobin => self.next_index(&provider.name, keys.len()),
        };

        Ok(keys[index].clone())
    }

    fn next_index(&self, provider_name: &str, len: usize) -> usize {
        let mut map = self
            .counters
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let counter = map.entry(provider_name.to_string()).or_insert(0);
        let index = *counter % len;
        *counter = counter.wrapping_add(1);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::ApiSource;

    fn provider(keys: &[&str]) -> Provider {
        Provider {
            name: "openai".to_string(),
            source: ApiSource::OpenAi,
            base_url: "https://api.openai.com".to_string(),
            api_keys: keys.iter().map(|k| k.to_string()).collect(),
            models_endpoint: None,
        }
    }

    #[test]
    fn first_available_always_picks_the_first_key() {
        let rotation = KeyRotation::new(KeyStrategy::FirstAvailable);
        let p = provider(&["a", "b", "c"]);
        for _ in 0..5 {
            assert_eq!(rotation.select(&p).unwrap(), "a");
        }
    }

    #[test]
    fn round_robin_cycles_through_keys() {
        let rotation = KeyRotation::new(KeyStrategy::RoundRobin);
        let p = provider(&["a", "b", "c"]);
        let picks: Vec<String> = (0..6).map(|_| rotation.select(&p).unwrap()).collect();
        assert_eq!(picks, ["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn random_stays_within_the_key_set() {
        let rotation = KeyRotation::new(KeyStrategy::Random);
        let p = provider(&["a", "b"]);
        for _ in 0..20 {
            let key = rotation.select(&p).unwrap();
            assert!(key == "a" || key == "b");
        }
    }

    #[test]
    fn empty_key_set_is_a_routing_error() {
        let rotation = KeyRotation::new(KeyStrategy::RoundRobin);
        let err = rotation.select(&provider(&[])).unwrap_err();
        assert!(matches!(err, GatewayError::Routing(_)));
    }
}
