use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NarrativeResult};

/// Flat advisor configuration: named numeric weights plus named options.
///
/// Dotted names such as `ethicalEmphasis.autonomy` are ordinary keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Numeric weights keyed by name.
    pub weights: IndexMap<String, f64>,
    /// String options keyed by name.
    pub options: IndexMap<String, String>,
}

impl AdvisorConfig {
    /// Empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a weight.
    #[must_use]
    pub fn with_weight(mut self, name: impl Into<String>, value: f64) -> Self {
        self.weights.insert(name.into(), value);
        self
    }

    /// Sets an option.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Looks up a weight.
    #[must_use]
    pub fn weight(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    /// Looks up an option.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// Returns a copy with every key of `overrides` replacing or extending this config.
    #[must_use]
    pub fn merged_with(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        for (name, value) in &overrides.weights {
            merged.weights.insert(name.clone(), *value);
        }
        for (name, value) in &overrides.options {
            merged.options.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Parses a JSON config document.
    pub fn from_json_str(raw: &str) -> NarrativeResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> NarrativeResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Required weight with an inclusive range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    /// Weight name.
    pub name: String,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Required option, optionally restricted to a set of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option name.
    pub name: String,
    /// Accepted values; empty accepts anything.
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// What an advisor needs from its configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigRequirements {
    /// Required weights.
    #[serde(default)]
    pub weights: Vec<WeightSpec>,
    /// Required options.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl ConfigRequirements {
    /// No requirements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a weight in `[0, 1]`.
    #[must_use]
    pub fn weight(self, name: impl Into<String>) -> Self {
        self.weight_in(name, 0.0, 1.0)
    }

    /// Requires a weight in `[min, max]`.
    #[must_use]
    pub fn weight_in(mut self, name: impl Into<String>, min: f64, max: f64) -> Self {
        self.weights.push(WeightSpec {
            name: name.into(),
            min,
            max,
        });
        self
    }

    /// Requires an option with any value.
    #[must_use]
    pub fn option(self, name: impl Into<String>) -> Self {
        self.option_in(name, Vec::<String>::new())
    }

    /// Requires an option whose value is one of `allowed`.
    #[must_use]
    pub fn option_in<I, S>(mut self, name: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.push(OptionSpec {
            name: name.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Checks `config`, reporting the first unmet requirement in declaration
    /// order (weights before options).
    pub fn validate(&self, config: &AdvisorConfig) -> Result<(), ConfigError> {
        for spec in &self.weights {
            let value = config
                .weight(&spec.name)
                .ok_or_else(|| ConfigError::MissingWeight(spec.name.clone()))?;
            // NaN fails the range check.
            if !(spec.min..=spec.max).contains(&value) {
                return Err(ConfigError::WeightOutOfRange {
                    name: spec.name.clone(),
                    value,
                    min: spec.min,
                    max: spec.max,
                });
            }
        }
        for spec in &self.options {
            let value = config
                .option(&spec.name)
                .ok_or_else(|| ConfigError::MissingOption(spec.name.clone()))?;
            if !spec.allowed.is_empty() && !spec.allowed.iter().any(|allowed| allowed == value) {
                return Err(ConfigError::InvalidOption {
                    name: spec.name.clone(),
                    value: value.to_string(),
                    allowed: spec.allowed.clone(),
                });
            }
        }
        Ok(())
    }

    /// True when nothing is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty() && self.options.is_empty()
    }
}
