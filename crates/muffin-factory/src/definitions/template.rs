//! Compiled attribute templates from definition records.

use indexmap::IndexMap;
use serde_json::Value;

use crate::attributes::Attributes;
use crate::error::{FactoryError, FactoryResult};
use crate::faker::FakerType;
use crate::generator::Generator;

#[derive(Debug, Clone)]
enum ValueTemplate {
	Literal(Value),
	Faker(FakerType),
	Sequence { key: String, format: String },
}

/// Attribute mapping from a definition record, ready to be generated.
///
/// An attribute written as `{"faker": "<kind>"}` draws a fresh fake value
/// every time; `{"sequence": "user{n}"}` substitutes a per-attribute
/// counter for `{n}`. Every other value is copied as-is.
#[derive(Debug, Clone)]
pub struct DefinitionTemplate {
	entries: IndexMap<String, ValueTemplate>,
}

impl DefinitionTemplate {
	/// Compiles the attributes of a record for `model`.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::ValidationError`] if `attributes` is not an
	/// object and [`FactoryError::FakerError`] for an unknown faker kind.
	pub fn compile(model: &str, attributes: &Value) -> FactoryResult<Self> {
		let object = attributes
			.as_object()
			.ok_or_else(|| FactoryError::ValidationError {
				field: "attributes".to_string(),
				message: "Attributes must be a JSON object".to_string(),
			})?;

		let mut entries = IndexMap::with_capacity(object.len());
		for (name, value) in object {
			entries.insert(name.clone(), Self::compile_value(model, name, value)?);
		}
		Ok(Self { entries })
	}

	fn compile_value(model: &str, name: &str, value: &Value) -> FactoryResult<ValueTemplate> {
		if let Value::Object(object) = value
			&& object.len() == 1
		{
			if let Some(kind) = object.get("faker") {
				let kind = kind.as_str().ok_or_else(|| {
					FactoryError::FakerError(format!("faker kind for '{}' must be a string", name))
				})?;
				return Ok(ValueTemplate::Faker(kind.parse()?));
			}
			if let Some(Value::String(format)) = object.get("sequence") {
				return Ok(ValueTemplate::Sequence {
					key: format!("{}.{}", model, name),
					format: format.clone(),
				});
			}
		}
		Ok(ValueTemplate::Literal(value.clone()))
	}

	/// Returns `true` if every attribute is a plain literal.
	pub fn is_static(&self) -> bool {
		self.entries
			.values()
			.all(|template| matches!(template, ValueTemplate::Literal(_)))
	}

	/// Number of attributes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the template declares no attributes.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Produces one attribute mapping.
	pub fn generate(&self, generator: &Generator) -> Attributes {
		self.entries
			.iter()
			.map(|(name, template)| {
				let value = match template {
					ValueTemplate::Literal(value) => value.clone(),
					ValueTemplate::Faker(kind) => kind.generate(generator),
					ValueTemplate::Sequence { key, format } => {
						Value::String(generator.sequence_format(key, format))
					}
				};
				(name.clone(), value)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_literals_are_static() {
		let template =
			DefinitionTemplate::compile("auth.User", &json!({"age": 30, "meta": {"a": 1, "b": 2}}))
				.unwrap();

		assert!(template.is_static());
		let attrs = template.generate(&Generator::new());
		assert_eq!(attrs.value("meta"), Some(&json!({"a": 1, "b": 2})));
	}

	#[rstest]
	fn test_sequence_counts_per_attribute() {
		let template = DefinitionTemplate::compile(
			"auth.User",
			&json!({"email": {"sequence": "user{n}@example.com"}}),
		)
		.unwrap();
		let generator = Generator::new();

		assert!(!template.is_static());
		assert_eq!(
			template.generate(&generator).value("email"),
			Some(&json!("user1@example.com"))
		);
		assert_eq!(
			template.generate(&generator).value("email"),
			Some(&json!("user2@example.com"))
		);
	}

	#[rstest]
	fn test_faker_value_generated() {
		let template =
			DefinitionTemplate::compile("auth.User", &json!({"email": {"faker": "email"}})).unwrap();

		let attrs = template.generate(&Generator::seeded(1));
		let email = attrs.value("email").and_then(Value::as_str).unwrap();
		assert!(email.contains('@'));
	}

	#[rstest]
	fn test_unknown_faker_rejected() {
		let result = DefinitionTemplate::compile("auth.User", &json!({"x": {"faker": "nope"}}));
		assert!(matches!(result, Err(FactoryError::FakerError(_))));
	}

	#[rstest]
	fn test_object_with_extra_keys_is_literal() {
		let value = json!({"faker": "email", "note": "kept"});
		let template = DefinitionTemplate::compile("auth.User", &json!({ "x": value })).unwrap();
		assert!(template.is_static());
	}
}
