// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime values of tracking parameters.

/// A present parameter value, tagged by how it is validated and rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	Text(String),
	Integer(i64),
	Decimal(f64),
	Bool(bool),
	/// Output of a value encoder. Pattern and length rules do not apply.
	Encoded(String),
}

impl ParamValue {
	/// The value as a number, if it is one.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			ParamValue::Integer(n) => Some(*n as f64),
			ParamValue::Decimal(n) => Some(*n),
			_ => None,
		}
	}

	/// The canonical query string form, before percent-encoding.
	pub fn render(&self) -> String {
		match self {
			ParamValue::Text(s) | ParamValue::Encoded(s) => s.clone(),
			ParamValue::Integer(n) => n.to_string(),
			ParamValue::Decimal(n) => format_decimal(*n),
			ParamValue::Bool(true) => "1".to_string(),
			ParamValue::Bool(false) => "0".to_string(),
		}
	}
}

/// Formats a float the way the tracking endpoint has always received it:
/// whole numbers keep one decimal place (`12.0`), others use the shortest form.
pub fn format_decimal(value: f64) -> String {
	if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
		format!("{value:.1}")
	} else {
		value.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_booleans_as_digits() {
		assert_eq!(ParamValue::Bool(true).render(), "1");
		assert_eq!(ParamValue::Bool(false).render(), "0");
	}

	#[test]
	fn renders_numbers() {
		assert_eq!(ParamValue::Integer(0).render(), "0");
		assert_eq!(ParamValue::Integer(-7).render(), "-7");
		assert_eq!(ParamValue::Decimal(12.0).render(), "12.0");
		assert_eq!(ParamValue::Decimal(12.5).render(), "12.5");
		assert_eq!(ParamValue::Decimal(-0.25).render(), "-0.25");
	}

	#[test]
	fn only_numbers_have_numeric_form() {
		assert_eq!(ParamValue::Integer(3).as_number(), Some(3.0));
		assert_eq!(ParamValue::Decimal(1.5).as_number(), Some(1.5));
		assert_eq!(ParamValue::Text("3".into()).as_number(), None);
		assert_eq!(ParamValue::Bool(true).as_number(), None);
	}
}
