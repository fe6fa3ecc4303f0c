// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for Matomo request encoding.

use thiserror::Error;

/// A single tracking parameter failed its declared rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for {field}. {constraint}")]
pub struct FieldValidationError {
	pub field: String,
	pub constraint: String,
}

impl FieldValidationError {
	pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			constraint: constraint.into(),
		}
	}
}

/// Errors raised while building values, validating or encoding requests.
#[derive(Debug, Error)]
pub enum MatomoError {
	/// A value was rejected at construction time.
	#[error("{0}")]
	InvalidArgument(String),

	/// A present parameter failed its rule while the query was being assembled.
	#[error("Could not append parameter {parameter}: {source}")]
	Encoding {
		parameter: String,
		#[source]
		source: FieldValidationError,
	},

	/// A policy spanning several fields was violated.
	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	/// Bulk submission was attempted with no queries.
	#[error("Bulk request must contain at least one query")]
	EmptyBulkRequest,

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl MatomoError {
	pub fn invalid_argument(message: impl Into<String>) -> Self {
		Self::InvalidArgument(message.into())
	}

	pub fn invalid_request(message: impl Into<String>) -> Self {
		Self::InvalidRequest(message.into())
	}

	/// Returns the underlying rule violation for encoding failures.
	pub fn field_error(&self) -> Option<&FieldValidationError> {
		match self {
			MatomoError::Encoding { source, .. } => Some(source),
			_ => None,
		}
	}
}

/// Result type for Matomo encoding operations.
pub type Result<T> = std::result::Result<T, MatomoError>;
