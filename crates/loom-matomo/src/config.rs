// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker configuration.

use std::fmt;

use loom_matomo_core::AUTH_TOKEN_PATTERN;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TrackerError};

pub const DEFAULT_USER_AGENT: &str = concat!("loom-matomo/", env!("CARGO_PKG_VERSION"));

/// One partial layer of tracker configuration. Layers are merged in
/// precedence order and then finalized.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackerConfigLayer {
	pub api_endpoint: Option<String>,
	pub default_site_id: Option<u32>,
	pub default_auth_token: Option<String>,
	pub enabled: Option<bool>,
	pub log_failed_tracking: Option<bool>,
	pub user_agent: Option<String>,
}

impl fmt::Debug for TrackerConfigLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TrackerConfigLayer")
			.field("api_endpoint", &self.api_endpoint)
			.field("default_site_id", &self.default_site_id)
			.field(
				"default_auth_token",
				&self.default_auth_token.as_ref().map(|_| "[REDACTED]"),
			)
			.field("enabled", &self.enabled)
			.field("log_failed_tracking", &self.log_failed_tracking)
			.field("user_agent", &self.user_agent)
			.finish()
	}
}

impl TrackerConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.api_endpoint.is_some() {
			self.api_endpoint = other.api_endpoint;
		}
		if other.default_site_id.is_some() {
			self.default_site_id = other.default_site_id;
		}
		if other.default_auth_token.is_some() {
			self.default_auth_token = other.default_auth_token;
		}
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.log_failed_tracking.is_some() {
			self.log_failed_tracking = other.log_failed_tracking;
		}
		if other.user_agent.is_some() {
			self.user_agent = other.user_agent;
		}
	}

	pub fn finalize(self) -> Result<TrackerConfig> {
		let endpoint = self
			.api_endpoint
			.filter(|s| !s.trim().is_empty())
			.ok_or_else(|| TrackerError::invalid_config("api_endpoint", "must be set"))?;
		let api_endpoint = parse_endpoint(&endpoint)?;

		if self.default_site_id == Some(0) {
			return Err(TrackerError::invalid_config(
				"default_site_id",
				"must be greater or equal than 1",
			));
		}

		let default_auth_token = self
			.default_auth_token
			.map(|token| token.trim().to_string())
			.filter(|token| !token.is_empty());
		if let Some(token) = &default_auth_token {
			if !AUTH_TOKEN_PATTERN.is_match(token) {
				return Err(TrackerError::invalid_config(
					"default_auth_token",
					format!(
						"must have exactly 32 characters and match {}",
						AUTH_TOKEN_PATTERN.source()
					),
				));
			}
		}

		Ok(TrackerConfig {
			api_endpoint,
			default_site_id: self.default_site_id,
			default_auth_token,
			enabled: self.enabled.unwrap_or(true),
			log_failed_tracking: self.log_failed_tracking.unwrap_or(false),
			user_agent: self
				.user_agent
				.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
		})
	}
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
	let url = Url::parse(endpoint)
		.map_err(|e| TrackerError::invalid_config("api_endpoint", format!("invalid URL '{endpoint}': {e}")))?;
	match url.scheme() {
		"http" | "https" => Ok(url),
		scheme => Err(TrackerError::invalid_config(
			"api_endpoint",
			format!("unsupported scheme '{scheme}', expected http or https"),
		)),
	}
}

/// Validated tracker configuration.
#[derive(Clone, PartialEq)]
pub struct TrackerConfig {
	/// Tracking endpoint, usually `https://<host>/matomo.php`.
	pub api_endpoint: Url,
	/// Site id used when a request does not carry one.
	pub default_site_id: Option<u32>,
	default_auth_token: Option<String>,
	/// When false, sends are skipped.
	pub enabled: bool,
	/// Log requests that fail validation or encoding.
	pub log_failed_tracking: bool,
	/// `User-Agent` header for transports.
	pub user_agent: String,
}

impl TrackerConfig {
	/// Configuration with only an endpoint; everything else defaulted.
	pub fn new(api_endpoint: &str) -> Result<Self> {
		TrackerConfigLayer {
			api_endpoint: Some(api_endpoint.to_string()),
			..TrackerConfigLayer::default()
		}
		.finalize()
	}

	pub fn default_auth_token(&self) -> Option<&str> {
		self.default_auth_token.as_deref()
	}
}

impl fmt::Debug for TrackerConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TrackerConfig")
			.field("api_endpoint", &self.api_endpoint.as_str())
			.field("default_site_id", &self.default_site_id)
			.field(
				"default_auth_token",
				&self.default_auth_token.as_ref().map(|_| "[REDACTED]"),
			)
			.field("enabled", &self.enabled)
			.field("log_failed_tracking", &self.log_failed_tracking)
			.field("user_agent", &self.user_agent)
			.finish()
	}
}
