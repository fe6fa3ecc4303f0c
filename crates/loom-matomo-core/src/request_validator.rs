// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policies spanning more than one field of a [`TrackingRequest`].

use chrono::{DateTime, Duration, Utc};

use crate::error::{MatomoError, Result};
use crate::request::TrackingRequest;
use crate::validation::AUTH_TOKEN_PATTERN;

/// Requests timestamped further back than this need an auth token.
pub const MAX_UNAUTHENTICATED_AGE_HOURS: i64 = 4;

/// Validates `request` against the cross-field rules, using the current time.
pub fn validate_request(request: &TrackingRequest, auth_token: Option<&str>) -> Result<()> {
	validate_request_at(request, auth_token, Utc::now())
}

/// Validates `request` as of `now`. Stops at the first violated rule.
pub fn validate_request_at(
	request: &TrackingRequest,
	auth_token: Option<&str>,
	now: DateTime<Utc>,
) -> Result<()> {
	if request.search_results_count.is_some() && request.search_query.is_none() {
		return Err(MatomoError::invalid_request(
			"Search query must be set if search results count is set",
		));
	}

	if auth_token.is_none() && request.has_visitor_location() {
		return Err(MatomoError::invalid_request(
			"Auth token must be present if longitude, latitude, region, city, country or IP are set",
		));
	}

	if auth_token.is_none() {
		if let Some(timestamp) = request.request_timestamp {
			if timestamp < now - Duration::hours(MAX_UNAUTHENTICATED_AGE_HOURS) {
				return Err(MatomoError::invalid_request(format!(
					"Auth token must be present if request timestamp is more than {MAX_UNAUTHENTICATED_AGE_HOURS} hours ago"
				)));
			}
		}
	}

	if let Some(token) = auth_token {
		validate_auth_token(token)?;
	}

	Ok(())
}

/// Checks that `token` is exactly 32 lowercase letters or digits.
pub fn validate_auth_token(token: &str) -> Result<()> {
	if AUTH_TOKEN_PATTERN.is_match(token) {
		Ok(())
	} else {
		Err(MatomoError::invalid_request(format!(
			"Auth token must have exactly 32 characters and match {}",
			AUTH_TOKEN_PATTERN.source()
		)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const TOKEN: &str = "876de1876fb2cda2816c362a61bfc712";

	fn now() -> DateTime<Utc> {
		DateTime::from_timestamp(1_700_000_000, 0).unwrap()
	}

	#[test]
	fn empty_request_passes() {
		assert!(validate_request_at(&TrackingRequest::default(), None, now()).is_ok());
	}

	#[test]
	fn search_count_requires_query() {
		let request = TrackingRequest {
			search_results_count: Some(3),
			..TrackingRequest::default()
		};
		let err = validate_request_at(&request, None, now()).unwrap_err();
		assert!(matches!(err, MatomoError::InvalidRequest(_)));
		assert!(err.to_string().contains("Search query must be set"));

		let request = TrackingRequest {
			search_query: Some("rust".to_string()),
			..request
		};
		assert!(validate_request_at(&request, None, now()).is_ok());
	}

	#[test]
	fn longitude_without_token_fails() {
		let request = TrackingRequest {
			visitor_longitude: Some(10.0),
			..TrackingRequest::default()
		};
		let err = validate_request_at(&request, None, now()).unwrap_err();
		assert!(matches!(err, MatomoError::InvalidRequest(_)));
		assert!(err.to_string().contains("Auth token must be present"));
		assert!(validate_request_at(&request, Some(TOKEN), now()).is_ok());
	}

	#[test]
	fn visitor_ip_without_token_fails() {
		let request = TrackingRequest {
			visitor_ip: Some("192.0.2.1".to_string()),
			..TrackingRequest::default()
		};
		assert!(validate_request_at(&request, None, now()).is_err());
	}

	#[test]
	fn old_timestamp_requires_token() {
		let request = TrackingRequest {
			request_timestamp: Some(now() - Duration::hours(5)),
			..TrackingRequest::default()
		};
		let err = validate_request_at(&request, None, now()).unwrap_err();
		assert!(err.to_string().contains("more than 4 hours ago"));
		assert!(validate_request_at(&request, Some(TOKEN), now()).is_ok());
	}

	#[test]
	fn recent_timestamp_needs_no_token() {
		let request = TrackingRequest {
			request_timestamp: Some(now() - Duration::hours(3)),
			..TrackingRequest::default()
		};
		assert!(validate_request_at(&request, None, now()).is_ok());
	}

	#[test]
	fn first_violation_wins() {
		let request = TrackingRequest {
			search_results_count: Some(1),
			visitor_city: Some("Berlin".to_string()),
			..TrackingRequest::default()
		};
		let err = validate_request_at(&request, None, now()).unwrap_err();
		assert!(err.to_string().contains("Search query"));
	}

	#[test]
	fn malformed_token_fails() {
		let err = validate_request_at(&TrackingRequest::default(), Some("ABC"), now()).unwrap_err();
		assert!(matches!(err, MatomoError::InvalidRequest(_)));
		assert!(validate_auth_token(&TOKEN.to_uppercase()).is_err());
		assert!(validate_auth_token(TOKEN).is_ok());
	}

	proptest! {
		#[test]
		fn lowercase_alphanumeric_tokens_of_32_pass(token in "[a-z0-9]{32}") {
			prop_assert!(validate_auth_token(&token).is_ok());
		}

		#[test]
		fn tokens_of_other_lengths_fail(token in "[a-z0-9]{0,31}|[a-z0-9]{33,40}") {
			prop_assert!(validate_auth_token(&token).is_err());
		}
	}
}
