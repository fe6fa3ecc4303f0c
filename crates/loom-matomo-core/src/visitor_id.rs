// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visitor identifiers (`_id` and `cid`).
//!
//! A visitor id is eight bytes rendered as sixteen lowercase hex characters.
//! It can be random, derived from a 64-bit hash, or parsed from hex.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{MatomoError, Result};

/// The sixteen-hex-character id that correlates requests of one visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitorId([u8; 8]);

impl VisitorId {
	/// Maximum number of hex characters accepted by [`VisitorId::from_hex`].
	pub const HEX_LENGTH: usize = 16;

	/// Creates a visitor id from a cryptographically strong random source.
	pub fn random() -> Self {
		let mut bytes = [0u8; 8];
		OsRng.fill_bytes(&mut bytes);
		Self(bytes)
	}

	/// Creates a deterministic visitor id from a 64-bit hash.
	///
	/// The most significant byte of the hash becomes the first byte of the id.
	pub fn from_hash(hash: i64) -> Self {
		Self(hash.to_be_bytes())
	}

	/// Creates a deterministic visitor id from an arbitrary string, e.g. a user name.
	pub fn from_string(value: &str) -> Self {
		Self::from_hash(i64::from(string_hash(value)))
	}

	/// Parses up to sixteen hex characters, left-padding with zero bytes.
	pub fn from_hex(input: &str) -> Result<Self> {
		if input.trim().is_empty() {
			return Err(MatomoError::invalid_argument(
				"Hex string must not be null or empty",
			));
		}
		if input.len() > Self::HEX_LENGTH {
			return Err(MatomoError::invalid_argument(format!(
				"Hex string must not be longer than {} characters",
				Self::HEX_LENGTH
			)));
		}
		if !input.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(MatomoError::invalid_argument(format!(
				"Input must be a valid hex string: {input}"
			)));
		}

		let value = u64::from_str_radix(input, 16)
			.map_err(|e| MatomoError::invalid_argument(format!("Invalid hex string {input}: {e}")))?;
		Ok(Self(value.to_be_bytes()))
	}

	pub fn as_bytes(&self) -> &[u8; 8] {
		&self.0
	}
}

impl std::fmt::Display for VisitorId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&hex::encode(self.0))
	}
}

impl std::str::FromStr for VisitorId {
	type Err = MatomoError;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_hex(s)
	}
}

// 31-multiplier polynomial hash over UTF-16 code units, stable across processes.
fn string_hash(value: &str) -> i32 {
	value
		.encode_utf16()
		.fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
