// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker facade: token resolution, validation and encoding ahead of the
//! transport.

use std::sync::Arc;

use loom_matomo_core::{
	resolve_auth_token, validate_request, QueryCreator, QueryStyle, TrackingRequest,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::TrackerConfig;
use crate::error::Result;

/// Transport for already encoded tracking payloads.
#[async_trait::async_trait]
pub trait TrackingSender: Send + Sync {
	/// Sends a single query string (no leading `?`) to `endpoint`.
	async fn send_query(&self, endpoint: &Url, query: &str) -> Result<()>;

	/// Posts a bulk JSON body to `endpoint`.
	async fn send_bulk(&self, endpoint: &Url, body: &str) -> Result<()>;
}

/// Encodes tracking requests with the configured defaults and hands them to a
/// [`TrackingSender`].
pub struct MatomoTracker {
	config: TrackerConfig,
	creator: QueryCreator,
	sender: Arc<dyn TrackingSender>,
}

impl MatomoTracker {
	pub fn new(config: TrackerConfig, sender: Arc<dyn TrackingSender>) -> Self {
		let creator = QueryCreator::new(config.default_site_id);
		Self {
			config,
			creator,
			sender,
		}
	}

	pub fn config(&self) -> &TrackerConfig {
		&self.config
	}

	/// Resolves the token, validates and encodes a single request.
	pub fn build_query(
		&self,
		request: &TrackingRequest,
		override_token: Option<&str>,
	) -> Result<String> {
		let token = self.resolve_token(override_token, std::slice::from_ref(request));
		if request.site_id().is_none() && self.config.default_site_id.is_some() {
			debug!(
				site_id = self.config.default_site_id,
				"applying default site id"
			);
		}
		validate_request(request, token.as_deref())?;
		Ok(self.creator.create_query(request, token.as_deref())?)
	}

	/// Resolves one token for all `requests`, validates each of them and
	/// encodes the bulk body. The token is carried by the envelope only.
	pub fn build_bulk_body(
		&self,
		requests: &[TrackingRequest],
		override_token: Option<&str>,
	) -> Result<String> {
		let token = self.resolve_token(override_token, requests);
		for request in requests {
			validate_request(request, token.as_deref())?;
		}
		Ok(self.creator.create_bulk_body(requests, token.as_deref())?)
	}

	/// Encodes and sends one request. Does nothing when tracking is disabled.
	pub async fn send_request(
		&self,
		request: &TrackingRequest,
		override_token: Option<&str>,
	) -> Result<()> {
		if !self.config.enabled {
			debug!("tracking disabled, skipping request");
			return Ok(());
		}

		let query = self
			.build_query(request, override_token)
			.inspect_err(|e| self.log_failure(std::slice::from_ref(request), e))?;

		debug!(endpoint = %self.config.api_endpoint, "sending tracking request");
		self
			.sender
			.send_query(&self.config.api_endpoint, &query)
			.await
			.inspect_err(|e| self.log_failure(std::slice::from_ref(request), e))
	}

	/// Encodes and sends several requests in one bulk call. Does nothing when
	/// tracking is disabled.
	pub async fn send_bulk_request(
		&self,
		requests: &[TrackingRequest],
		override_token: Option<&str>,
	) -> Result<()> {
		if !self.config.enabled {
			debug!(count = requests.len(), "tracking disabled, skipping bulk request");
			return Ok(());
		}

		let body = self
			.build_bulk_body(requests, override_token)
			.inspect_err(|e| self.log_failure(requests, e))?;

		info!(
			count = requests.len(),
			endpoint = %self.config.api_endpoint,
			"sending bulk tracking request"
		);
		self
			.sender
			.send_bulk(&self.config.api_endpoint, &body)
			.await
			.inspect_err(|e| self.log_failure(requests, e))
	}

	fn resolve_token(
		&self,
		override_token: Option<&str>,
		requests: &[TrackingRequest],
	) -> Option<String> {
		let token = resolve_auth_token(override_token, requests, self.config.default_auth_token());
		debug!(has_token = token.is_some(), "resolved auth token");
		token
	}

	/// Logs a failed request in the readable style, without its token.
	fn log_failure(&self, requests: &[TrackingRequest], error: &crate::error::TrackerError) {
		if !self.config.log_failed_tracking {
			return;
		}
		let readable = self.creator.clone().with_style(QueryStyle::Readable);
		for request in requests {
			let query = readable
				.create_query(request, None)
				.unwrap_or_else(|e| format!("<unencodable: {e}>"));
			warn!(error = %error, query = %query, "could not track request");
		}
	}
}
