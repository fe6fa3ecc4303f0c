// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Six-character page view ids (`pv_id`).

use rand::rngs::OsRng;
use rand::RngCore;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Cosmetic identifier correlating a page view with its follow-up requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueId(u64);

impl UniqueId {
	pub const LENGTH: usize = 6;

	pub fn random() -> Self {
		Self(OsRng.next_u64())
	}

	pub fn from_value(value: u64) -> Self {
		Self(value)
	}

	pub fn value(&self) -> u64 {
		self.0
	}
}

impl std::fmt::Display for UniqueId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let rendered: String = (0..Self::LENGTH)
			.map(|i| {
				let slice = (self.0 >> (i * 8)) & 0xff;
				ALPHABET[(slice % 62) as usize] as char
			})
			.collect();
		f.write_str(&rendered)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn zero_maps_to_first_symbol() {
		assert_eq!(UniqueId::from_value(0).to_string(), "000000");
	}

	#[test]
	fn low_byte_comes_first() {
		// 0x0a = 10 -> 'A', 0x3d = 61 -> 'z'
		assert_eq!(UniqueId::from_value(0x3d0a).to_string(), "Az0000");
	}

	#[test]
	fn slices_wrap_modulo_62() {
		// 0xff = 255 -> 255 % 62 = 7
		assert_eq!(UniqueId::from_value(0xff).to_string(), "700000");
	}

	#[test]
	fn upper_bytes_are_ignored() {
		let low = UniqueId::from_value(0x0000_1234_5678_9abc);
		let high = UniqueId::from_value(0xffff_1234_5678_9abc);
		assert_eq!(low.to_string(), high.to_string());
	}

	proptest! {
		#[test]
		fn always_six_alphanumeric_chars(value: u64) {
			let rendered = UniqueId::from_value(value).to_string();
			prop_assert_eq!(rendered.len(), UniqueId::LENGTH);
			prop_assert!(rendered.chars().all(|c| c.is_ascii_alphanumeric()));
		}
	}
}
