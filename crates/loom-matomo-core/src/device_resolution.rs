// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Screen resolution (`res`).

use crate::error::{MatomoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceResolution {
	pub width: u32,
	pub height: u32,
}

impl DeviceResolution {
	pub fn new(width: u32, height: u32) -> Self {
		Self { width, height }
	}
}

impl std::fmt::Display for DeviceResolution {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}

impl std::str::FromStr for DeviceResolution {
	type Err = MatomoError;

	/// Parses `WIDTHxHEIGHT`, e.g. `1920x1080`.
	fn from_str(s: &str) -> Result<Self> {
		let invalid = || {
			MatomoError::invalid_argument(format!(
				"Device resolution must be in format WIDTHxHEIGHT: {s}"
			))
		};
		let parts: Vec<&str> = s.trim().split('x').collect();
		let [width, height] = parts.as_slice() else {
			return Err(invalid());
		};
		Ok(Self {
			width: width.parse().map_err(|_| invalid())?,
			height: height.parse().map_err(|_| invalid())?,
		})
	}
}
