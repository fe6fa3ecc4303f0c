// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bulk tracking envelope.
//!
//! ```text
//! {"requests":["?idsite=1&rec=1...","?idsite=1&rec=1..."],"token_auth":"..."}
//! ```

use serde::Serialize;

use crate::error::{MatomoError, Result};

/// JSON body for submitting several tracking requests in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRequest {
	requests: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	token_auth: Option<String>,
}

impl BulkRequest {
	/// Wraps already assembled queries. Fails when `queries` is empty.
	pub fn new<I, S>(queries: I, auth_token: Option<&str>) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let requests: Vec<String> = queries
			.into_iter()
			.map(|query| format!("?{}", query.as_ref()))
			.collect();
		if requests.is_empty() {
			return Err(MatomoError::EmptyBulkRequest);
		}
		Ok(Self {
			requests,
			token_auth: auth_token.map(str::to_string),
		})
	}

	pub fn requests(&self) -> &[String] {
		&self.requests
	}

	pub fn token_auth(&self) -> Option<&str> {
		self.token_auth.as_deref()
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}
