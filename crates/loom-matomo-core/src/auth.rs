// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Auth token resolution.

use crate::request::TrackingRequest;

/// Picks the token for one encoding operation.
///
/// Resolution order (highest to lowest priority):
/// 1. `override_token`
/// 2. The first request, in iteration order, that carries a token
/// 3. `default_token` (the tracker-wide token)
///
/// Blank tokens (empty or whitespace only) are skipped at every step.
pub fn resolve_auth_token<'a, I>(
	override_token: Option<&str>,
	requests: I,
	default_token: Option<&str>,
) -> Option<String>
where
	I: IntoIterator<Item = &'a TrackingRequest>,
{
	if let Some(token) = non_blank(override_token) {
		return Some(token.to_string());
	}

	if let Some(token) = requests
		.into_iter()
		.find_map(|request| non_blank(request.auth_token.as_deref()))
	{
		return Some(token.to_string());
	}

	non_blank(default_token).map(str::to_string)
}

fn non_blank(token: Option<&str>) -> Option<&str> {
	token.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	const OVERRIDE: &str = "00000000000000000000000000000001";
	const PER_REQUEST: &str = "00000000000000000000000000000002";
	const DEFAULT: &str = "00000000000000000000000000000003";

	fn with_token(token: Option<&str>) -> TrackingRequest {
		TrackingRequest {
			auth_token: token.map(str::to_string),
			..TrackingRequest::default()
		}
	}

	#[test]
	fn override_wins() {
		let requests = [with_token(Some(PER_REQUEST))];
		assert_eq!(
			resolve_auth_token(Some(OVERRIDE), &requests, Some(DEFAULT)).as_deref(),
			Some(OVERRIDE)
		);
	}

	#[test]
	fn per_request_token_when_no_override() {
		let requests = [with_token(Some(PER_REQUEST))];
		assert_eq!(
			resolve_auth_token(None, &requests, Some(DEFAULT)).as_deref(),
			Some(PER_REQUEST)
		);
	}

	#[test]
	fn default_when_no_override_or_request_token() {
		let requests = [with_token(None)];
		assert_eq!(
			resolve_auth_token(None, &requests, Some(DEFAULT)).as_deref(),
			Some(DEFAULT)
		);
	}

	#[test]
	fn absent_when_nothing_set() {
		let requests = [with_token(None)];
		assert_eq!(resolve_auth_token(None, &requests, None), None);
	}

	#[test]
	fn first_non_blank_request_token_in_order() {
		let requests = [
			with_token(None),
			with_token(Some("   ")),
			with_token(Some(PER_REQUEST)),
			with_token(Some(DEFAULT)),
		];
		assert_eq!(
			resolve_auth_token(Some(""), &requests, None).as_deref(),
			Some(PER_REQUEST)
		);
	}

	#[test]
	fn blank_default_is_absent() {
		assert_eq!(resolve_auth_token(Some(" "), &[], Some("\t")), None);
	}
}
