//! Random scalar values.
//!
//! Every draw goes through the `rng` handle the caller passes in; there is no
//! ambient random state, so a seeded generator reproduces the same values.

use crate::config::{GeneratorConfig, UnsignedDomain};
use crate::error::Result;
use crate::types::ScalarType;
use crate::value::Value;
use rand::Rng;

/// Characters used for generated strings
pub const ASCII_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Decimal digits kept for `float` values
pub const FLOAT_DIGITS: i32 = 4;
/// Decimal digits kept for `double` values
pub const DOUBLE_DIGITS: i32 = 8;

/// Draws one value of a scalar type.
#[derive(Debug, Clone, Copy)]
pub struct ValueGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ValueGenerator<'a> {
    /// The config is validated here, so later draws never see an empty
    /// length range.
    pub fn new(config: &'a GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, ty: ScalarType) -> Value {
        match ty {
            ScalarType::Int8 => Value::Int(rng.random::<i8>() as i64),
            ScalarType::Int16 => Value::Int(rng.random::<i16>() as i64),
            ScalarType::Int32 => Value::Int(rng.random::<i32>() as i64),
            ScalarType::Int64 => Value::Int(rng.random::<i64>()),
            ScalarType::Uint8
            | ScalarType::Uint16
            | ScalarType::Uint32
            | ScalarType::Uint64 => Value::Uint(self.unsigned(rng, ty)),
            ScalarType::Float => Value::Float(ratio(
                rng,
                |r: &mut R| r.random::<u32>() as f64,
                FLOAT_DIGITS,
            )),
            ScalarType::Double => Value::Float(ratio(
                rng,
                |r: &mut R| r.random::<u64>() as f64,
                DOUBLE_DIGITS,
            )),
            ScalarType::Boolean => Value::Bool(rng.random_bool(0.5)),
            ScalarType::String | ScalarType::Utf8 => Value::Str(self.letters(rng)),
        }
    }

    fn unsigned<R: Rng + ?Sized>(&self, rng: &mut R, ty: ScalarType) -> u64 {
        // Types without a width never reach this point
        let width = ty.int_width().unwrap_or(64);
        match self.config.unsigned_domain {
            UnsignedDomain::SignedCompatible => rng.random_range(0..=(u64::MAX >> (65 - width))),
            UnsignedDomain::Full => rng.random_range(0..=(u64::MAX >> (64 - width))),
        }
    }

    fn letters<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let len = rng.random_range(1..=self.config.max_string_len);
        (0..len)
            .map(|_| ASCII_LETTERS[rng.random_range(0..ASCII_LETTERS.len())] as char)
            .collect()
    }
}

/// `numerator / denominator` rounded to `digits` places. A zero denominator
/// is redrawn, so the result is always finite.
fn ratio<R, F>(rng: &mut R, mut draw: F, digits: i32) -> f64
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> f64,
{
    let numerator = draw(rng);
    let denominator = loop {
        let d = draw(rng);
        if d != 0.0 {
            break d;
        }
    };
    round_to(numerator / denominator, digits)
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample(ty: ScalarType, config: &GeneratorConfig, n: usize) -> Vec<Value> {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let gen = ValueGenerator::new(config).unwrap();
        (0..n).map(|_| gen.generate(&mut rng, ty)).collect()
    }

    #[test]
    fn test_signed_ranges() {
        let config = GeneratorConfig::default();
        for (ty, bits) in [
            (ScalarType::Int8, 8),
            (ScalarType::Int16, 16),
            (ScalarType::Int32, 32),
        ] {
            let lo = -(1i64 << (bits - 1));
            let hi = 1i64 << (bits - 1);
            let mut saw_negative = false;
            for value in sample(ty, &config, 2000) {
                let Value::Int(v) = value else {
                    panic!("expected Int for {}", ty)
                };
                assert!(v >= lo && v < hi, "{} out of range for {}", v, ty);
                saw_negative |= v < 0;
            }
            assert!(saw_negative, "{} never produced a negative value", ty);
        }
    }

    #[test]
    fn test_unsigned_signed_compatible_range() {
        let config = GeneratorConfig::default();
        for (ty, bits) in [
            (ScalarType::Uint8, 8u32),
            (ScalarType::Uint16, 16),
            (ScalarType::Uint32, 32),
            (ScalarType::Uint64, 64),
        ] {
            let bound = 1u128 << (bits - 1);
            for value in sample(ty, &config, 2000) {
                let Value::Uint(v) = value else {
                    panic!("expected Uint for {}", ty)
                };
                assert!((v as u128) < bound, "{} out of range for {}", v, ty);
            }
        }
    }

    #[test]
    fn test_unsigned_full_range_reaches_upper_half() {
        let config = GeneratorConfig::default().with_unsigned_domain(UnsignedDomain::Full);
        let values = sample(ScalarType::Uint8, &config, 2000);
        assert!(values
            .iter()
            .any(|v| matches!(v, Value::Uint(n) if *n >= 128)));
        assert!(values
            .iter()
            .all(|v| matches!(v, Value::Uint(n) if *n <= 255)));
    }

    #[test]
    fn test_full_uint64_upper_half_has_no_suffix() {
        let config = GeneratorConfig::default().with_unsigned_domain(UnsignedDomain::Full);
        let large: Vec<u64> = sample(ScalarType::Uint64, &config, 200)
            .into_iter()
            .filter_map(|v| match v {
                Value::Uint(n) if n > i64::MAX as u64 => Some(n),
                _ => None,
            })
            .collect();
        assert!(!large.is_empty());

        // Plain decimal, the same token an out-of-range int64 would have
        for n in large {
            assert_eq!(crate::yson::to_string(&Value::Uint(n)), n.to_string());
        }
    }

    #[test]
    fn test_float_rounding() {
        let config = GeneratorConfig::default();
        for value in sample(ScalarType::Float, &config, 500) {
            let Value::Float(f) = value else {
                panic!("expected Float")
            };
            assert!(f.is_finite() && f >= 0.0);
            assert_eq!(f, round_to(f, FLOAT_DIGITS));
        }
        for value in sample(ScalarType::Double, &config, 500) {
            let Value::Float(f) = value else {
                panic!("expected Float")
            };
            assert!(f.is_finite() && f >= 0.0);
        }
    }

    #[test]
    fn test_zero_denominator_is_redrawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut calls = 0;
        let value = ratio(
            &mut rng,
            |_: &mut ChaCha8Rng| {
                calls += 1;
                match calls {
                    1 => 3.0,
                    2 | 3 => 0.0,
                    _ => 4.0,
                }
            },
            FLOAT_DIGITS,
        );
        assert_eq!(value, 0.75);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_strings_are_ascii_letters() {
        let config = GeneratorConfig::default();
        let mut lengths = std::collections::HashSet::new();
        for value in sample(ScalarType::String, &config, 2000) {
            let Value::Str(s) = value else {
                panic!("expected Str")
            };
            assert!((1..=50).contains(&s.len()));
            assert!(s.bytes().all(|b| b.is_ascii_alphabetic()));
            lengths.insert(s.len());
        }
        assert!(lengths.contains(&1));
        assert!(lengths.contains(&50));
    }

    #[test]
    fn test_zero_string_length_bound_rejected() {
        let config = GeneratorConfig {
            max_string_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            ValueGenerator::new(&config),
            Err(crate::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bool_is_roughly_fair() {
        let config = GeneratorConfig::default();
        let trues = sample(ScalarType::Boolean, &config, 10_000)
            .into_iter()
            .filter(|v| *v == Value::Bool(true))
            .count();
        assert!((4_500..5_500).contains(&trues), "trues = {}", trues);
    }

    #[test]
    fn test_deterministic_generation() {
        let config = GeneratorConfig::default();
        for ty in ScalarType::ALL {
            assert_eq!(sample(ty, &config, 20), sample(ty, &config, 20));
        }
    }
}
