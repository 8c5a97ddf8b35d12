//! Generator settings.
//!
//! Every field has a default matching the reference benchmark datasets, so an
//! empty YAML document (or no config at all) reproduces them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value range used for unsigned integer columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsignedDomain {
    /// `[0, 2^(n-1))`: the non-negative half of the signed type of the same
    /// width. This is what the reference datasets contain.
    #[default]
    SignedCompatible,
    /// `[0, 2^n)`
    ///
    /// Integers are written without a type suffix, so a YT text reader takes
    /// `uint64` values of `2^63` and above for out-of-range `int64` tokens.
    /// Only use this domain with readers that parse by column type.
    Full,
}

impl FromStr for UnsignedDomain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "signed-compatible" => Ok(UnsignedDomain::SignedCompatible),
            "full" => Ok(UnsignedDomain::Full),
            _ => Err(format!(
                "Unknown unsigned domain: {}. Valid options: signed-compatible, full",
                s
            )),
        }
    }
}

impl fmt::Display for UnsignedDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsignedDomain::SignedCompatible => write!(f, "signed-compatible"),
            UnsignedDomain::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Probability that a non-required column (and, independently, an
    /// `optional` composite) is null
    pub null_probability: f64,
    /// Upper bound for list and dict lengths (lower bound is 1)
    pub max_collection_len: usize,
    /// Upper bound for string lengths (lower bound is 1)
    pub max_string_len: usize,
    pub unsigned_domain: UnsignedDomain,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            null_probability: 0.1,
            max_collection_len: 50,
            max_string_len: 50,
            unsigned_domain: UnsignedDomain::SignedCompatible,
        }
    }
}

impl GeneratorConfig {
    /// Parse from YAML; missing keys take their defaults.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: GeneratorConfig = if input.trim().is_empty() {
            GeneratorConfig::default()
        } else {
            serde_yaml_ng::from_str(input).map_err(|e| Error::InvalidConfig(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_unsigned_domain(mut self, domain: UnsignedDomain) -> Self {
        self.unsigned_domain = domain;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.null_probability) {
            return Err(Error::InvalidConfig(format!(
                "null_probability must be between 0 and 1, got {}",
                self.null_probability
            )));
        }
        if self.max_collection_len == 0 {
            return Err(Error::InvalidConfig(
                "max_collection_len must be at least 1".to_string(),
            ));
        }
        if self.max_string_len == 0 {
            return Err(Error::InvalidConfig(
                "max_string_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.null_probability, 0.1);
        assert_eq!(config.max_collection_len, 50);
        assert_eq!(config.max_string_len, 50);
        assert_eq!(config.unsigned_domain, UnsignedDomain::SignedCompatible);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config =
            GeneratorConfig::from_yaml_str("max_string_len: 8\nunsigned_domain: full\n").unwrap();
        assert_eq!(config.max_string_len, 8);
        assert_eq!(config.unsigned_domain, UnsignedDomain::Full);
        assert_eq!(config.max_collection_len, 50);

        assert_eq!(
            GeneratorConfig::from_yaml_str("").unwrap(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            GeneratorConfig::from_yaml_str("null_probability: 1.5"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_yaml_str("max_collection_len: 0"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_yaml_str("unsigned_domain: half"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unsigned_domain_parse() {
        assert_eq!(
            "full".parse::<UnsignedDomain>().unwrap(),
            UnsignedDomain::Full
        );
        assert_eq!(
            "Signed-Compatible".parse::<UnsignedDomain>().unwrap(),
            UnsignedDomain::SignedCompatible
        );
        assert!("half".parse::<UnsignedDomain>().is_err());
        assert_eq!(UnsignedDomain::Full.to_string(), "full");
    }
}
