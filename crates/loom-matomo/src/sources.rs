// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: an optional TOML file and environment variables.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{TrackerConfig, TrackerConfigLayer};
use crate::error::{Result, TrackerError};

/// Source precedence levels (higher = overrides lower). Built-in defaults
/// are not a source; [`TrackerConfigLayer::finalize`] fills them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<TrackerConfigLayer>;
}

/// Optional tracker config file. Tracking is usually configured from the
/// environment alone, so an absent file contributes an empty layer; any other
/// read failure is an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"tracker-file"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<TrackerConfigLayer> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(path = %self.path.display(), "no tracker config file");
				return Ok(TrackerConfigLayer::default());
			}
			Err(source) => {
				return Err(TrackerError::FileRead {
					path: self.path.clone(),
					source,
				})
			}
		};

		toml::from_str(&content).map_err(|source| TrackerError::TomlParse {
			path: self.path.clone(),
			source,
		})
	}
}

/// Environment variable source.
///
/// Convention: MATOMO_TRACKER_<FIELD>
pub struct EnvSource;

impl EnvSource {
	fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<TrackerConfigLayer> {
		let var = |name: &str| lookup(name).filter(|s| !s.is_empty());
		let flag = |name: &str| var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1");

		let default_site_id = match var("MATOMO_TRACKER_DEFAULT_SITE_ID") {
			Some(v) => Some(v.parse().map_err(|_| {
				TrackerError::invalid_config(
					"MATOMO_TRACKER_DEFAULT_SITE_ID",
					format!("invalid u32 value '{v}'"),
				)
			})?),
			None => None,
		};

		Ok(TrackerConfigLayer {
			api_endpoint: var("MATOMO_TRACKER_API_ENDPOINT"),
			default_site_id,
			default_auth_token: var("MATOMO_TRACKER_DEFAULT_AUTH_TOKEN"),
			enabled: flag("MATOMO_TRACKER_ENABLED"),
			log_failed_tracking: flag("MATOMO_TRACKER_LOG_FAILED_TRACKING"),
			user_agent: var("MATOMO_TRACKER_USER_AGENT"),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<TrackerConfigLayer> {
		debug!("loading environment variables");
		Self::load_with(|name| std::env::var(name).ok())
	}
}

/// Merges `sources` in precedence order and finalizes the result.
pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<TrackerConfig> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = TrackerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	merged.finalize()
}

/// Load configuration with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`MATOMO_TRACKER_*`)
/// 2. Config file at `config_path`, if it exists
/// 3. Built-in defaults
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<TrackerConfig> {
	load_from_sources(vec![Box::new(TomlSource::new(config_path)), Box::new(EnvSource)])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<TrackerConfig> {
	load_from_sources(vec![Box::new(EnvSource)])
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	struct StaticSource(Precedence, TrackerConfigLayer);

	impl ConfigSource for StaticSource {
		fn name(&self) -> &'static str {
			"static"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<TrackerConfigLayer> {
			Ok(self.1.clone())
		}
	}

	fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_env_source_reads_all_keys() {
		let vars = env(&[
			("MATOMO_TRACKER_API_ENDPOINT", "https://example.com/matomo.php"),
			("MATOMO_TRACKER_DEFAULT_SITE_ID", "5"),
			("MATOMO_TRACKER_DEFAULT_AUTH_TOKEN", "876de1876fb2cda2816c362a61bfc712"),
			("MATOMO_TRACKER_ENABLED", "false"),
			("MATOMO_TRACKER_LOG_FAILED_TRACKING", "1"),
			("MATOMO_TRACKER_USER_AGENT", "custom-agent"),
		]);
		let layer = EnvSource::load_with(|name| vars.get(name).cloned()).unwrap();

		assert_eq!(layer.api_endpoint.as_deref(), Some("https://example.com/matomo.php"));
		assert_eq!(layer.default_site_id, Some(5));
		assert_eq!(
			layer.default_auth_token.as_deref(),
			Some("876de1876fb2cda2816c362a61bfc712")
		);
		assert_eq!(layer.enabled, Some(false));
		assert_eq!(layer.log_failed_tracking, Some(true));
		assert_eq!(layer.user_agent.as_deref(), Some("custom-agent"));
	}

	#[test]
	fn test_env_source_ignores_empty_values() {
		let vars = env(&[("MATOMO_TRACKER_API_ENDPOINT", "")]);
		let layer = EnvSource::load_with(|name| vars.get(name).cloned()).unwrap();
		assert_eq!(layer, TrackerConfigLayer::default());
	}

	#[test]
	fn test_env_source_rejects_bad_site_id() {
		let vars = env(&[("MATOMO_TRACKER_DEFAULT_SITE_ID", "abc")]);
		let err = EnvSource::load_with(|name| vars.get(name).cloned()).unwrap_err();
		assert!(matches!(err, TrackerError::InvalidConfig { .. }));
	}

	#[test]
	fn test_toml_source_missing_file_is_empty() {
		let source = TomlSource::new("/nonexistent/matomo-tracker.toml");
		assert_eq!(source.load().unwrap(), TrackerConfigLayer::default());
	}

	#[test]
	fn test_toml_source_unreadable_path_fails() {
		let dir = tempfile::tempdir().unwrap();
		let err = TomlSource::new(dir.path()).load().unwrap_err();
		assert!(matches!(err, TrackerError::FileRead { .. }));
	}

	#[test]
	fn test_toml_source_parses_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"api_endpoint = \"https://example.com/matomo.php\"\ndefault_site_id = 9\nlog_failed_tracking = true"
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.api_endpoint.as_deref(), Some("https://example.com/matomo.php"));
		assert_eq!(layer.default_site_id, Some(9));
		assert_eq!(layer.log_failed_tracking, Some(true));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "default_site_id = \"nine\"").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, TrackerError::TomlParse { .. }));
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(StaticSource(
				Precedence::Environment,
				TrackerConfigLayer {
					default_site_id: Some(2),
					..TrackerConfigLayer::default()
				},
			)),
			Box::new(StaticSource(
				Precedence::ConfigFile,
				TrackerConfigLayer {
					api_endpoint: Some("https://example.com/matomo.php".to_string()),
					default_site_id: Some(1),
					..TrackerConfigLayer::default()
				},
			)),
		])
		.unwrap();

		assert_eq!(config.default_site_id, Some(2));
		assert_eq!(config.api_endpoint.as_str(), "https://example.com/matomo.php");
		assert!(config.enabled);
		assert!(!config.log_failed_tracking);
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}
}
