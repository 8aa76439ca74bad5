//! Factory configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FactoryError, FactoryResult};

/// Prefix of the environment variables read by [`FactoryConfig::from_env`].
pub const ENV_PREFIX: &str = "MUFFIN_";

/// Settings used by [`Factory::from_config`](crate::Factory::from_config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
	/// Seed for the shared generator; entropy when unset.
	pub seed: Option<u64>,

	/// Directory scanned for definition files.
	pub definitions_path: Option<PathBuf>,

	/// Maximum directory depth scanned below `definitions_path`.
	pub max_depth: Option<usize>,
}

impl FactoryConfig {
	/// Creates an empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the generator seed.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Sets the definitions directory.
	pub fn with_definitions_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.definitions_path = Some(path.into());
		self
	}

	/// Limits how deep the definitions directory is scanned.
	pub fn with_max_depth(mut self, depth: usize) -> Self {
		self.max_depth = Some(depth);
		self
	}

	/// Reads `MUFFIN_SEED`, `MUFFIN_DEFINITIONS_PATH` and `MUFFIN_MAX_DEPTH`.
	///
	/// Unset variables leave the defaults in place.
	pub fn from_env() -> FactoryResult<Self> {
		Self::from_vars(std::env::vars())
	}

	/// Builds a configuration from `(name, value)` pairs, using only the
	/// names that start with [`ENV_PREFIX`].
	///
	/// # Errors
	///
	/// Returns [`FactoryError::Config`] for a value that does not parse.
	pub fn from_vars<I, K, V>(vars: I) -> FactoryResult<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut config = Self::default();

		for (key, value) in vars {
			let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let value = value.into();

			match name.to_lowercase().as_str() {
				"seed" => config.seed = Some(parse_var(name, &value)?),
				"definitions_path" => config.definitions_path = Some(PathBuf::from(value)),
				"max_depth" => config.max_depth = Some(parse_var(name, &value)?),
				_ => {}
			}
		}

		Ok(config)
	}
}

fn parse_var<T>(name: &str, value: &str) -> FactoryResult<T>
where
	T: std::str::FromStr,
	T::Err: std::fmt::Display,
{
	value.trim().parse().map_err(|e| {
		FactoryError::Config(format!("invalid {}{}={:?}: {}", ENV_PREFIX, name, value, e))
	})
}
