// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative per-parameter rules.
//!
//! Each tracking parameter carries a [`FieldRule`]: an optional full-match
//! pattern, an optional maximum character length, and an optional numeric
//! range. Pattern and length apply to plain text only; encoded values such as
//! visitor ids were already validated when they were constructed.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::FieldValidationError;
use crate::value::ParamValue;

/// A regular expression that must match the whole value.
#[derive(Debug)]
pub struct FieldPattern {
	source: &'static str,
	compiled: OnceLock<Regex>,
}

impl FieldPattern {
	pub const fn new(source: &'static str) -> Self {
		Self {
			source,
			compiled: OnceLock::new(),
		}
	}

	pub fn source(&self) -> &'static str {
		self.source
	}

	pub fn is_match(&self, value: &str) -> bool {
		self
			.compiled
			.get_or_init(|| {
				Regex::new(&format!("^(?:{})$", self.source)).expect("field patterns are static and valid")
			})
			.is_match(value)
	}
}

/// Lower-case letters and digits, exactly 32 characters.
pub static AUTH_TOKEN_PATTERN: FieldPattern = FieldPattern::new("[a-z0-9]{32}");

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRule {
	pub pattern: Option<&'static FieldPattern>,
	pub max_length: Option<usize>,
	pub min: Option<f64>,
	pub max: Option<f64>,
}

impl FieldRule {
	pub const NONE: Self = Self {
		pattern: None,
		max_length: None,
		min: None,
		max: None,
	};

	pub const fn matching(pattern: &'static FieldPattern) -> Self {
		Self {
			pattern: Some(pattern),
			..Self::NONE
		}
	}

	pub const fn max_length(max_length: usize) -> Self {
		Self {
			max_length: Some(max_length),
			..Self::NONE
		}
	}

	pub const fn at_least(min: f64) -> Self {
		Self {
			min: Some(min),
			..Self::NONE
		}
	}

	pub const fn between(min: f64, max: f64) -> Self {
		Self {
			min: Some(min),
			max: Some(max),
			..Self::NONE
		}
	}

	/// Checks `value` for the parameter named `field`.
	pub fn validate(&self, field: &str, value: &ParamValue) -> Result<(), FieldValidationError> {
		if let ParamValue::Text(text) = value {
			if let Some(pattern) = self.pattern {
				if !pattern.is_match(text) {
					return Err(FieldValidationError::new(
						field,
						format!("Must match regex {}", pattern.source()),
					));
				}
			}
			if let Some(max_length) = self.max_length {
				if text.chars().count() > max_length {
					return Err(FieldValidationError::new(
						field,
						format!("Must be less or equal than {max_length} characters"),
					));
				}
			}
		}

		let number = match value {
			ParamValue::Text(text) if self.min.is_some() || self.max.is_some() => text.trim().parse().ok(),
			other => other.as_number(),
		};
		if let Some(number) = number {
			if !number.is_finite() {
				return match (self.min, self.max) {
					(_, Some(max)) if number == f64::INFINITY => Err(upper_bound_error(field, max)),
					(Some(min), _) => Err(lower_bound_error(field, min)),
					(None, Some(max)) => Err(upper_bound_error(field, max)),
					(None, None) => Ok(()),
				};
			}
			if let Some(min) = self.min {
				if number < min {
					return Err(lower_bound_error(field, min));
				}
			}
			if let Some(max) = self.max {
				if number > max {
					return Err(upper_bound_error(field, max));
				}
			}
		}

		Ok(())
	}
}

fn lower_bound_error(field: &str, min: f64) -> FieldValidationError {
	FieldValidationError::new(
		field,
		format!("Must be greater or equal than {}", format_bound(min)),
	)
}

fn upper_bound_error(field: &str, max: f64) -> FieldValidationError {
	FieldValidationError::new(
		field,
		format!("Must be less or equal than {}", format_bound(max)),
	)
}

fn format_bound(bound: f64) -> String {
	if bound.fract() == 0.0 {
		format!("{}", bound as i64)
	} else {
		bound.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	static TWO_DIGITS: FieldPattern = FieldPattern::new("[0-9]{2}");

	#[test]
	fn hour_range_upper_bound() {
		let err = FieldRule::between(0.0, 23.0)
			.validate("h", &ParamValue::Integer(24))
			.unwrap_err();
		assert_eq!(err.to_string(), "Invalid value for h. Must be less or equal than 23");
	}

	#[test]
	fn range_lower_bound() {
		let err = FieldRule::between(-90.0, 90.0)
			.validate("lat", &ParamValue::Decimal(-90.5))
			.unwrap_err();
		assert_eq!(err.to_string(), "Invalid value for lat. Must be greater or equal than -90");
	}

	#[test]
	fn range_inclusive_bounds_pass() {
		let rule = FieldRule::between(0.0, 59.0);
		assert!(rule.validate("m", &ParamValue::Integer(0)).is_ok());
		assert!(rule.validate("m", &ParamValue::Integer(59)).is_ok());
	}

	#[test]
	fn non_finite_numbers_fail_ranged_rules() {
		let rule = FieldRule::between(-90.0, 90.0);
		let err = rule.validate("lat", &ParamValue::Decimal(f64::NAN)).unwrap_err();
		assert_eq!(err.to_string(), "Invalid value for lat. Must be greater or equal than -90");
		let err = rule.validate("lat", &ParamValue::Decimal(f64::INFINITY)).unwrap_err();
		assert_eq!(err.to_string(), "Invalid value for lat. Must be less or equal than 90");
		let err = rule.validate("lat", &ParamValue::Decimal(f64::NEG_INFINITY)).unwrap_err();
		assert_eq!(err.to_string(), "Invalid value for lat. Must be greater or equal than -90");
		assert!(rule.validate("lat", &ParamValue::Text("NaN".into())).is_err());
	}

	#[test]
	fn non_finite_numbers_pass_unranged_rules() {
		assert!(FieldRule::NONE.validate("x", &ParamValue::Decimal(f64::NAN)).is_ok());
	}

	#[test]
	fn pattern_must_match_whole_value() {
		let rule = FieldRule::matching(&TWO_DIGITS);
		assert!(rule.validate("x", &ParamValue::Text("42".into())).is_ok());
		let err = rule.validate("x", &ParamValue::Text("421".into())).unwrap_err();
		assert_eq!(err.to_string(), "Invalid value for x. Must match regex [0-9]{2}");
	}

	#[test]
	fn auth_token_pattern() {
		let rule = FieldRule::matching(&AUTH_TOKEN_PATTERN);
		let ok = ParamValue::Text("876de1876fb2cda2816c362a61bfc712".into());
		assert!(rule.validate("token_auth", &ok).is_ok());
		let upper = ParamValue::Text("876DE1876FB2CDA2816C362A61BFC712".into());
		assert!(rule.validate("token_auth", &upper).is_err());
	}

	#[test]
	fn max_length_counts_characters() {
		let rule = FieldRule::max_length(2);
		assert!(rule.validate("region", &ParamValue::Text("äö".into())).is_ok());
		let err = rule.validate("region", &ParamValue::Text("abc".into())).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Invalid value for region. Must be less or equal than 2 characters"
		);
	}

	#[test]
	fn encoded_values_bypass_text_rules() {
		let rule = FieldRule::max_length(2);
		assert!(rule.validate("pv_id", &ParamValue::Encoded("abcdef".into())).is_ok());
	}

	#[test]
	fn numeric_text_is_range_checked() {
		let rule = FieldRule::at_least(1.0);
		assert!(rule.validate("idsite", &ParamValue::Text("0".into())).is_err());
		assert!(rule.validate("idsite", &ParamValue::Text("abc".into())).is_ok());
	}

	#[test]
	fn empty_rule_accepts_anything() {
		assert!(FieldRule::NONE.validate("x", &ParamValue::Text(String::new())).is_ok());
		assert!(FieldRule::NONE.validate("x", &ParamValue::Bool(false)).is_ok());
	}

	proptest! {
		#[test]
		fn in_range_values_pass(n in -180.0f64..=180.0) {
			prop_assert!(FieldRule::between(-180.0, 180.0).validate("long", &ParamValue::Decimal(n)).is_ok());
		}

		#[test]
		fn out_of_range_hours_fail(h in 24i64..10_000) {
			prop_assert!(FieldRule::between(0.0, 23.0).validate("h", &ParamValue::Integer(h)).is_err());
		}
	}
}
