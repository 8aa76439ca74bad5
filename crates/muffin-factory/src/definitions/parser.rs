//! Definition file parsing.

use std::path::Path;

use super::{DefinitionFile, DefinitionFormat, DefinitionRecord};
use crate::error::{FactoryError, FactoryResult};

/// Parser for definition files.
///
/// Supports JSON, and YAML with the `yaml` feature.
#[derive(Debug, Default)]
pub struct DefinitionParser;

impl DefinitionParser {
	/// Creates a new parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses a definition file, detecting the format from its extension.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file extension is not recognized
	/// - The file cannot be read
	/// - The content is not a record or a list of records
	pub fn parse_file(&self, path: &Path) -> FactoryResult<DefinitionFile> {
		let format = DefinitionFormat::from_path(path).ok_or_else(|| {
			FactoryError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				FactoryError::FileNotFound(path.display().to_string())
			} else {
				FactoryError::IoError(e)
			}
		})?;

		let mut file = self.parse_string(&content, format)?;
		file.source = Some(path.display().to_string());
		Ok(file)
	}

	/// Parses definition records from a string.
	pub fn parse_string(
		&self,
		content: &str,
		format: DefinitionFormat,
	) -> FactoryResult<DefinitionFile> {
		let records = match format {
			DefinitionFormat::Json => self.parse_json(content)?,
			DefinitionFormat::Yaml => self.parse_yaml(content)?,
		};

		Ok(DefinitionFile::from_records(records, format))
	}

	fn parse_json(&self, content: &str) -> FactoryResult<Vec<DefinitionRecord>> {
		let value: serde_json::Value = serde_json::from_str(content)?;

		match value {
			serde_json::Value::Array(items) => items
				.into_iter()
				.enumerate()
				.map(|(idx, item)| {
					let record: DefinitionRecord = serde_json::from_value(item).map_err(|e| {
						FactoryError::ParseError(format!("Invalid record at index {}: {}", idx, e))
					})?;
					self.validate_record(&record)?;
					Ok(record)
				})
				.collect(),
			serde_json::Value::Object(_) => {
				let record: DefinitionRecord = serde_json::from_value(value)?;
				self.validate_record(&record)?;
				Ok(vec![record])
			}
			_ => Err(FactoryError::ParseError(
				"Expected array or object".to_string(),
			)),
		}
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> FactoryResult<Vec<DefinitionRecord>> {
		let value: serde_yaml::Value = serde_yaml::from_str(content)?;

		match value {
			serde_yaml::Value::Sequence(items) => items
				.into_iter()
				.enumerate()
				.map(|(idx, item)| {
					let record: DefinitionRecord = serde_yaml::from_value(item).map_err(|e| {
						FactoryError::ParseError(format!("Invalid record at index {}: {}", idx, e))
					})?;
					self.validate_record(&record)?;
					Ok(record)
				})
				.collect(),
			serde_yaml::Value::Mapping(_) => {
				let record: DefinitionRecord = serde_yaml::from_value(value)?;
				self.validate_record(&record)?;
				Ok(vec![record])
			}
			_ => Err(FactoryError::ParseError(
				"Expected sequence or mapping".to_string(),
			)),
		}
	}

	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> FactoryResult<Vec<DefinitionRecord>> {
		Err(FactoryError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}

	fn validate_record(&self, record: &DefinitionRecord) -> FactoryResult<()> {
		if record.model.trim().is_empty() {
			return Err(FactoryError::ValidationError {
				field: "model".to_string(),
				message: "Model identifier must not be empty".to_string(),
			});
		}

		if !record.attributes.is_object() {
			return Err(FactoryError::ValidationError {
				field: "attributes".to_string(),
				message: "Attributes must be a JSON object".to_string(),
			});
		}

		if record.name.is_some() && record.state.is_some() {
			return Err(FactoryError::ParseError(format!(
				"Record for '{}' declares both a blueprint name and a state",
				record.model
			)));
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[rstest]
	fn test_parse_json_array() {
		let parser = DefinitionParser::new();
		let content = r#"[
			{"model": "auth.User", "attributes": {"username": "admin"}},
			{"model": "auth.User", "state": "staff", "attributes": {"is_staff": true}}
		]"#;

		let file = parser.parse_string(content, DefinitionFormat::Json).unwrap();
		assert_eq!(file.len(), 2);
		assert_eq!(file.records[0].blueprint_name(), "default");
		assert_eq!(file.records[1].state.as_deref(), Some("staff"));
	}

	#[rstest]
	fn test_parse_json_single_object() {
		let parser = DefinitionParser::new();
		let content = r#"{"model": "auth.User", "name": "guest", "attributes": {}}"#;

		let file = parser.parse_string(content, DefinitionFormat::Json).unwrap();
		assert_eq!(file.len(), 1);
		assert_eq!(file.records[0].blueprint_name(), "guest");
	}

	#[rstest]
	#[case(r#"[{"model": "", "attributes": {}}]"#, "model")]
	#[case(r#"[{"model": "auth.User", "attributes": [1, 2]}]"#, "attributes")]
	fn test_parse_invalid_record(#[case] content: &str, #[case] expected_field: &str) {
		let parser = DefinitionParser::new();
		let result = parser.parse_string(content, DefinitionFormat::Json);

		if let Err(FactoryError::ValidationError { field, .. }) = result {
			assert_eq!(field, expected_field);
		} else {
			panic!("Expected ValidationError");
		}
	}

	#[rstest]
	fn test_parse_name_and_state_conflict() {
		let parser = DefinitionParser::new();
		let content = r#"{"model": "auth.User", "name": "a", "state": "b"}"#;

		let result = parser.parse_string(content, DefinitionFormat::Json);
		assert!(matches!(result, Err(FactoryError::ParseError(_))));
	}

	#[rstest]
	fn test_parse_scalar_rejected() {
		let parser = DefinitionParser::new();
		let result = parser.parse_string("42", DefinitionFormat::Json);
		assert!(matches!(result, Err(FactoryError::ParseError(_))));
	}

	#[rstest]
	fn test_parse_file() {
		let parser = DefinitionParser::new();
		let mut file = NamedTempFile::with_suffix(".json").unwrap();
		writeln!(file, r#"[{{"model": "auth.User", "attributes": {{"age": 30}}}}]"#).unwrap();

		let parsed = parser.parse_file(file.path()).unwrap();
		assert_eq!(parsed.len(), 1);
		assert!(parsed.source.is_some());
	}

	#[rstest]
	fn test_parse_file_not_found() {
		let parser = DefinitionParser::new();
		let result = parser.parse_file(Path::new("/nonexistent/users.json"));
		assert!(matches!(result, Err(FactoryError::FileNotFound(_))));
	}

	#[rstest]
	fn test_parse_unsupported_extension() {
		let parser = DefinitionParser::new();
		let result = parser.parse_file(Path::new("users.toml"));
		assert!(matches!(result, Err(FactoryError::UnsupportedExtension(_))));
	}

	#[cfg(feature = "yaml")]
	#[rstest]
	fn test_parse_yaml() {
		let parser = DefinitionParser::new();
		let content = r#"
- model: auth.User
  attributes:
    username:
      faker: username
- model: auth.User
  state: admin
  attributes:
    is_admin: true
"#;

		let file = parser.parse_string(content, DefinitionFormat::Yaml).unwrap();
		assert_eq!(file.len(), 2);
		assert!(file.records[1].is_state());
	}
}
