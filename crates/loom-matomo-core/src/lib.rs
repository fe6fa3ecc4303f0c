// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core encoding for the Matomo Tracking HTTP API.
//!
//! This crate turns a [`TrackingRequest`] into the exact query string the
//! Matomo collection endpoint expects, or into the JSON envelope used for bulk
//! submission. It performs no I/O; the `loom-matomo` crate layers config and
//! transport on top.
//!
//! # Overview
//!
//! - Value encoders for visitor ids, page view ids, nonces, custom variables,
//!   ecommerce items, accept-language headers, countries and resolutions
//! - A static parameter table binding every wire name to its validation rule
//! - Ordered query assembly with per-field validation
//! - Auth token resolution and cross-field request validation
//! - The bulk request envelope
//!
//! # Example
//!
//! ```
//! use loom_matomo_core::{QueryCreator, RandomValue, TrackingRequest, VisitorId};
//!
//! let request = TrackingRequest::builder()
//!     .visitor_id(VisitorId::from_hash(1234567890123456789))
//!     .random_value(RandomValue::from_literal("random-value"))
//!     .build();
//!
//! let query = QueryCreator::new(Some(42))
//!     .create_query(&request, Some("876de1876fb2cda2816c362a61bfc712"))
//!     .unwrap();
//! assert!(query.starts_with("idsite=42&token_auth="));
//! ```

pub mod accept_language;
pub mod auth;
pub mod bulk;
pub mod country;
pub mod custom_variable;
pub mod device_resolution;
pub mod ecommerce;
pub mod error;
pub mod parameters;
pub mod query;
pub mod random_value;
pub mod request;
pub mod request_validator;
pub mod unique_id;
pub mod validation;
pub mod value;
pub mod visitor_id;

pub use accept_language::{AcceptLanguage, LanguageRange};
pub use auth::resolve_auth_token;
pub use bulk::BulkRequest;
pub use country::Country;
pub use custom_variable::{CustomVariable, CustomVariables, CustomVariablesBuilder};
pub use device_resolution::DeviceResolution;
pub use ecommerce::{EcommerceItem, EcommerceItems, EcommerceItemsBuilder};
pub use error::{FieldValidationError, MatomoError, Result};
pub use query::{QueryCreator, QueryStyle};
pub use random_value::RandomValue;
pub use request::{TrackingRequest, TrackingRequestBuilder};
pub use request_validator::{validate_auth_token, validate_request, validate_request_at};
pub use unique_id::UniqueId;
pub use validation::{FieldPattern, FieldRule, AUTH_TOKEN_PATTERN};
pub use value::ParamValue;
pub use visitor_id::VisitorId;
