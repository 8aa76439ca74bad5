//! Definition file format.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::blueprint::DEFAULT_BLUEPRINT;

/// One blueprint or state declared in a definition file.
///
/// # Example
///
/// ```json
/// {
///   "model": "auth.User",
///   "name": "default",
///   "attributes": {
///     "username": {"faker": "username"},
///     "email": {"sequence": "user{n}@example.com"},
///     "active": true
///   }
/// }
/// ```
///
/// A record with `state` instead of `name` declares a state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefinitionRecord {
	/// Model identifier (e.g., "auth.User").
	pub model: String,

	/// Blueprint name; `"default"` when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// State name; the record declares a state when present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,

	/// Attribute templates as a JSON object.
	#[serde(default = "empty_object")]
	pub attributes: Value,
}

fn empty_object() -> Value {
	Value::Object(Default::default())
}

impl DefinitionRecord {
	/// Creates a blueprint record.
	pub fn blueprint(model: impl Into<String>, name: impl Into<String>, attributes: Value) -> Self {
		Self {
			model: model.into(),
			name: Some(name.into()),
			state: None,
			attributes,
		}
	}

	/// Creates a state record.
	pub fn state(model: impl Into<String>, state: impl Into<String>, attributes: Value) -> Self {
		Self {
			model: model.into(),
			name: None,
			state: Some(state.into()),
			attributes,
		}
	}

	/// Blueprint name this record registers under.
	pub fn blueprint_name(&self) -> &str {
		self.name.as_deref().unwrap_or(DEFAULT_BLUEPRINT)
	}

	/// Returns `true` if this record declares a state.
	pub fn is_state(&self) -> bool {
		self.state.is_some()
	}
}

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DefinitionFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires `yaml` feature).
	Yaml,
}

impl DefinitionFormat {
	/// Determines the format from a file extension.
	///
	/// ```
	/// # use muffin_factory::definitions::DefinitionFormat;
	/// assert_eq!(DefinitionFormat::from_extension("json"), Some(DefinitionFormat::Json));
	/// assert_eq!(DefinitionFormat::from_extension("YML"), Some(DefinitionFormat::Yaml));
	/// assert_eq!(DefinitionFormat::from_extension("toml"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns the default file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Yaml => "yaml",
		}
	}

	/// Returns `true` if this build can parse the format.
	pub fn is_enabled(&self) -> bool {
		match self {
			Self::Json => true,
			Self::Yaml => cfg!(feature = "yaml"),
		}
	}
}

impl std::fmt::Display for DefinitionFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}

/// Records parsed from one definition file.
#[derive(Debug, Clone)]
pub struct DefinitionFile {
	/// Parsed records, in file order.
	pub records: Vec<DefinitionRecord>,

	/// Format the records were parsed from.
	pub format: DefinitionFormat,

	/// Source file path, when parsed from a file.
	pub source: Option<String>,
}

impl DefinitionFile {
	/// Creates a container from parsed records.
	pub fn from_records(records: Vec<DefinitionRecord>, format: DefinitionFormat) -> Self {
		Self {
			records,
			format,
			source: None,
		}
	}

	/// Returns the number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns `true` if there are no records.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_record_defaults() {
		let record: DefinitionRecord = serde_json::from_value(json!({"model": "auth.User"})).unwrap();

		assert_eq!(record.blueprint_name(), "default");
		assert!(!record.is_state());
		assert_eq!(record.attributes, json!({}));
	}

	#[rstest]
	fn test_state_record() {
		let record = DefinitionRecord::state("auth.User", "admin", json!({"is_admin": true}));
		assert!(record.is_state());
	}

	#[rstest]
	#[case("definitions/users.json", Some(DefinitionFormat::Json))]
	#[case("users.yml", Some(DefinitionFormat::Yaml))]
	#[case("users.toml", None)]
	#[case("README", None)]
	fn test_format_from_path(#[case] path: &str, #[case] expected: Option<DefinitionFormat>) {
		assert_eq!(DefinitionFormat::from_path(Path::new(path)), expected);
	}

	#[rstest]
	fn test_json_always_enabled() {
		assert!(DefinitionFormat::Json.is_enabled());
		assert_eq!(DefinitionFormat::Yaml.is_enabled(), cfg!(feature = "yaml"));
	}
}
