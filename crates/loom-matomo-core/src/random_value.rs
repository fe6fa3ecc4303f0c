// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cache-busting nonce sent as `rand`.

use rand::rngs::OsRng;
use rand::RngCore;

/// Either ten random bytes as hex, or a fixed literal supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomValue(String);

impl RandomValue {
	const RANDOM_BYTES: usize = 10;

	pub fn random() -> Self {
		let mut bytes = [0u8; Self::RANDOM_BYTES];
		OsRng.fill_bytes(&mut bytes);
		Self(hex::encode(bytes))
	}

	/// Uses `value` verbatim. Intended for deterministic output in tests.
	pub fn from_literal(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for RandomValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn random_is_twenty_lowercase_hex() {
		let value = RandomValue::random();
		assert_eq!(value.as_str().len(), 20);
		assert!(value
			.as_str()
			.chars()
			.all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
	}

	#[test]
	fn random_values_differ() {
		assert_ne!(RandomValue::random(), RandomValue::random());
	}

	#[test]
	fn literal_is_kept_verbatim() {
		assert_eq!(RandomValue::from_literal("random-value").to_string(), "random-value");
	}
}
