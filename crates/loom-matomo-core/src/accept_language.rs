// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Accept-Language values (`lang`), per RFC 4647 language ranges.

use crate::error::{MatomoError, Result};
use crate::value::format_decimal;

/// A language range with its quality weight.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
	range: String,
	weight: f64,
}

impl LanguageRange {
	pub const MAX_WEIGHT: f64 = 1.0;

	/// Creates a range such as `en-us` or `*`. The range is lower-cased.
	pub fn new(range: &str, weight: f64) -> Result<Self> {
		let range = range.trim();
		let well_formed = !range.is_empty()
			&& range
				.split('-')
				.all(|tag| !tag.is_empty() && tag.len() <= 8 && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '*'));
		if !well_formed {
			return Err(MatomoError::invalid_argument(format!(
				"Invalid language range: {range}"
			)));
		}
		if !(0.0..=Self::MAX_WEIGHT).contains(&weight) {
			return Err(MatomoError::invalid_argument(format!(
				"Language range weight must be between 0.0 and 1.0: {weight}"
			)));
		}
		Ok(Self {
			range: range.to_ascii_lowercase(),
			weight,
		})
	}

	pub fn range(&self) -> &str {
		&self.range
	}

	pub fn weight(&self) -> f64 {
		self.weight
	}

	/// The first two-letter region subtag, e.g. `us` for `en-us`.
	pub fn region(&self) -> Option<&str> {
		self
			.range
			.split('-')
			.skip(1)
			.find(|tag| tag.len() == 2 && tag.chars().all(|c| c.is_ascii_alphabetic()))
	}
}

impl std::fmt::Display for LanguageRange {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.weight == Self::MAX_WEIGHT {
			f.write_str(&self.range)
		} else {
			write!(f, "{};q={}", self.range, format_decimal(self.weight))
		}
	}
}

/// Ordered list of language ranges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptLanguage {
	ranges: Vec<LanguageRange>,
}

impl AcceptLanguage {
	pub fn new(ranges: Vec<LanguageRange>) -> Self {
		Self { ranges }
	}

	/// Parses a header value such as `en-US,en;q=0.9,de;q=0.5`.
	pub fn parse(header: &str) -> Result<Self> {
		let mut ranges = Vec::new();
		for entry in header.split(',').map(str::trim).filter(|e| !e.is_empty()) {
			let mut parts = entry.split(';');
			let range = parts.next().unwrap_or_default();
			let mut weight = LanguageRange::MAX_WEIGHT;
			for param in parts {
				if let Some(q) = param.trim().strip_prefix("q=") {
					weight = q.trim().parse().map_err(|_| {
						MatomoError::invalid_argument(format!("Invalid language range weight: {q}"))
					})?;
				}
			}
			ranges.push(LanguageRange::new(range, weight)?);
		}
		Ok(Self { ranges })
	}

	pub fn ranges(&self) -> &[LanguageRange] {
		&self.ranges
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}
}

impl std::fmt::Display for AcceptLanguage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (i, range) in self.ranges.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			write!(f, "{range}")?;
		}
		Ok(())
	}
}

impl std::str::FromStr for AcceptLanguage {
	type Err = MatomoError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}
