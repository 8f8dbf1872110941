use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{CoreError, CoreResult};

/// Flat mapping of named construction options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigOptions(BTreeMap<String, Value>);

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> CoreResult<Self> {
        serde_json::from_str(raw)
            .map_err(|error| CoreError::invalid_config(format!("invalid options JSON: {error}")))
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys from `overrides` replace keys already present.
    pub fn merged_with(&self, overrides: &ConfigOptions) -> ConfigOptions {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        ConfigOptions(merged)
    }

    pub fn partition(
        &self,
        mut accept: impl FnMut(&str) -> bool,
    ) -> (ConfigOptions, ConfigOptions) {
        let mut accepted = BTreeMap::new();
        let mut rest = BTreeMap::new();
        for (key, value) in &self.0 {
            if accept(key) {
                accepted.insert(key.clone(), value.clone());
            } else {
                rest.insert(key.clone(), value.clone());
            }
        }
        (ConfigOptions(accepted), ConfigOptions(rest))
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> CoreResult<T> {
        let object = Value::Object(self.0.clone().into_iter().collect());
        serde_json::from_value(object)
            .map_err(|error| CoreError::invalid_config(format!("invalid options: {error}")))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ConfigOptions(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

const DEFAULT_SEED: u64 = 42;
const DEFAULT_MAX_EPISODE_STEPS: u32 = 27_000;

/// Options every engine accepts, regardless of its domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    pub num_envs: usize,
    /// Zero means "same as `num_envs`".
    pub batch_size: usize,
    /// Zero lets the engine choose.
    pub num_threads: usize,
    pub seed: u64,
    pub max_episode_steps: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_envs: 1,
            batch_size: 0,
            num_threads: 0,
            seed: DEFAULT_SEED,
            max_episode_steps: DEFAULT_MAX_EPISODE_STEPS,
        }
    }
}

impl PoolConfig {
    pub const KEYS: [&'static str; 5] = [
        "num_envs",
        "batch_size",
        "num_threads",
        "seed",
        "max_episode_steps",
    ];

    /// Splits `options` into the generic pool config and the remaining domain options.
    pub fn split(options: &ConfigOptions) -> CoreResult<(PoolConfig, ConfigOptions)> {
        let (generic, domain) = options.partition(|key| Self::KEYS.contains(&key));
        let mut config: PoolConfig = generic.deserialize()?;
        if config.batch_size == 0 {
            config.batch_size = config.num_envs;
        }
        config.validate()?;
        Ok((config, domain))
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.num_envs == 0 {
            return Err(CoreError::invalid_config("num_envs must be at least 1"));
        }
        if self.batch_size > self.num_envs {
            return Err(CoreError::invalid_config(format!(
                "batch_size {} exceeds num_envs {}",
                self.batch_size, self.num_envs
            )));
        }
        if self.max_episode_steps == 0 {
            return Err(CoreError::invalid_config(
                "max_episode_steps must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ConfigOptions, PoolConfig};
    use crate::models::CoreErrorKind;

    #[test]
    fn split_fills_defaults_and_keeps_domain_keys() {
        let options = ConfigOptions::new()
            .with("num_envs", 8)
            .with("episode_length", 3);

        let (config, domain) = PoolConfig::split(&options).unwrap();
        assert_eq!(config.num_envs, 8);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.seed, 42);
        assert_eq!(domain.get("episode_length"), Some(&json!(3)));
        assert_eq!(domain.len(), 1);
    }

    #[test]
    fn split_rejects_batch_larger_than_pool() {
        let options = ConfigOptions::new()
            .with("num_envs", 2)
            .with("batch_size", 4);

        let error = PoolConfig::split(&options).unwrap_err();
        assert_eq!(error.kind, CoreErrorKind::InvalidConfig);
    }

    #[test]
    fn split_rejects_wrongly_typed_values() {
        let options = ConfigOptions::new().with("num_envs", "four");

        let error = PoolConfig::split(&options).unwrap_err();
        assert_eq!(error.kind, CoreErrorKind::InvalidConfig);
    }

    #[test]
    fn merged_with_prefers_overrides() {
        let defaults = ConfigOptions::new().with("seed", 1).with("num_envs", 2);
        let overrides = ConfigOptions::from_json(r#"{"seed": 7}"#).unwrap();

        let merged = defaults.merged_with(&overrides);
        assert_eq!(merged.get("seed"), Some(&json!(7)));
        assert_eq!(merged.get("num_envs"), Some(&json!(2)));
    }
}
