// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Matomo tracker.

use std::path::PathBuf;

use loom_matomo_core::MatomoError;
use thiserror::Error;

/// Tracker errors.
#[derive(Debug, Error)]
pub enum TrackerError {
	/// The request could not be validated or encoded.
	#[error(transparent)]
	Matomo(#[from] MatomoError),

	/// A configuration value is missing or malformed.
	#[error("invalid value for {key}: {message}")]
	InvalidConfig { key: String, message: String },

	/// TOML parsing error.
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// The config file exists but could not be read.
	#[error("failed to read {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The tracking endpoint answered with an error status.
	#[error("tracking endpoint error ({status}): {message}")]
	SendFailed { status: u16, message: String },

	/// The request never reached the endpoint.
	#[error("tracking request failed: {0}")]
	RequestFailed(String),
}

impl TrackerError {
	pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidConfig {
			key: key.into(),
			message: message.into(),
		}
	}

	/// Whether resending the same payload may succeed. Encoding is
	/// deterministic, so only transport failures qualify.
	pub fn is_retryable(&self) -> bool {
		match self {
			TrackerError::SendFailed { status, .. } => {
				matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
			}
			TrackerError::RequestFailed(_) => true,
			_ => false,
		}
	}
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
