// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Matomo tracker for Loom.
//!
//! This crate provides:
//! - Layered configuration from defaults, a TOML file and the environment
//!   (`MATOMO_TRACKER_*`)
//! - [`MatomoTracker`], which resolves the auth token, validates and encodes
//!   requests with `loom-matomo-core`
//! - The [`TrackingSender`] transport contract
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use loom_matomo::{load_config_with_file, MatomoTracker, TrackingRequest};
//!
//! let config = load_config_with_file("/etc/loom/matomo.toml")?;
//! let tracker = MatomoTracker::new(config, Arc::new(my_sender));
//!
//! let request = TrackingRequest::builder()
//!     .action_name("Dashboard")
//!     .action_url("https://app.example.com/dashboard")
//!     .build();
//! tracker.send_request(&request, None).await?;
//! ```

pub mod config;
pub mod error;
pub mod sources;
pub mod tracker;

pub use config::{TrackerConfig, TrackerConfigLayer, DEFAULT_USER_AGENT};
pub use error::{Result, TrackerError};
pub use sources::{
	load_config_from_env, load_config_with_file, load_from_sources, ConfigSource, EnvSource,
	Precedence, TomlSource,
};
pub use tracker::{MatomoTracker, TrackingSender};

pub use loom_matomo_core::{
	AcceptLanguage, Country, CustomVariable, CustomVariables, DeviceResolution, EcommerceItem,
	EcommerceItems, MatomoError, QueryStyle, RandomValue, TrackingRequest, TrackingRequestBuilder,
	UniqueId, VisitorId,
};
