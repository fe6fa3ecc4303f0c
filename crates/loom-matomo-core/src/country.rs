// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Two-letter visitor country codes (`country`).

use crate::accept_language::AcceptLanguage;
use crate::error::{MatomoError, Result};

/// A lower-case ISO 3166-1 alpha-2 style code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Country(String);

impl Country {
	/// Parses a country code.
	///
	/// Returns `Ok(None)` for empty or blank input, and an error for anything
	/// that is not exactly two letters.
	pub fn from_code(code: &str) -> Result<Option<Self>> {
		let code = code.trim();
		if code.is_empty() {
			return Ok(None);
		}
		if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
			return Err(MatomoError::invalid_argument(format!(
				"Invalid country code: {code}"
			)));
		}
		Ok(Some(Self(code.to_ascii_lowercase())))
	}

	/// Uses the region of the first range that has one, e.g. `de-AT` -> `at`.
	pub fn from_language_ranges(languages: &AcceptLanguage) -> Option<Self> {
		languages
			.ranges()
			.iter()
			.find_map(|range| range.region())
			.map(|region| Self(region.to_ascii_lowercase()))
	}

	/// Derives the country from a locale tag such as `de-DE` or `pt_BR`.
	pub fn from_locale(locale: &str) -> Result<Option<Self>> {
		let mut subtags = locale.trim().split(['-', '_']);
		let language = subtags.next().unwrap_or_default();
		if language.is_empty() {
			return Ok(None);
		}
		match subtags.find(|tag| tag.len() == 2) {
			Some(region) => Self::from_code(region),
			None => Ok(None),
		}
	}

	pub fn code(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for Country {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}
