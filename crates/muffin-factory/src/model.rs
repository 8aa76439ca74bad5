//! Contract between the factory and the models it builds.
//!
//! The factory does not know how records are stored. A model only needs to
//! be default-constructible, accept a resolved attribute mapping without
//! validating it, save itself, and report its primary key.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::attributes::ResolvedAttributes;
use crate::error::{FactoryError, FactoryResult};

/// Anything that can report a primary key.
///
/// Split out of [`Model`] so existing instances can be stored as attribute
/// values ([`Attribute::Instance`](crate::Attribute::Instance)). Composite
/// keys are returned as JSON arrays or objects; an unsaved record usually
/// returns `Value::Null`.
pub trait Identifiable {
	/// Returns the primary key value.
	fn primary_key(&self) -> Value;
}

/// A model the factory can instantiate and persist.
///
/// # Example
///
/// ```
/// use muffin_factory::{FactoryResult, Identifiable, Model, ResolvedAttributes, assign_with_serde};
/// use serde::{Deserialize, Serialize};
/// use serde_json::{Value, json};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct User {
///     id: Option<i64>,
///     name: String,
/// }
///
/// impl Identifiable for User {
///     fn primary_key(&self) -> Value {
///         json!(self.id)
///     }
/// }
///
/// impl Model for User {
///     type Error = std::io::Error;
///
///     fn model_id() -> &'static str {
///         "auth.User"
///     }
///
///     fn assign_attributes(&mut self, attributes: &ResolvedAttributes) -> FactoryResult<()> {
///         assign_with_serde(self, attributes)
///     }
///
///     fn save(&mut self, _validate: bool) -> Result<(), Self::Error> {
///         self.id = Some(1);
///         Ok(())
///     }
/// }
/// ```
pub trait Model: Identifiable + Default + Send + 'static {
	/// Error reported by [`save`](Model::save).
	type Error: std::error::Error + Send + Sync + 'static;

	/// Registry key for this model.
	///
	/// Defaults to the Rust type name. Override it with a stable label such
	/// as `"auth.User"` to let definition files refer to the model.
	fn model_id() -> &'static str {
		std::any::type_name::<Self>()
	}

	/// Assigns every resolved attribute to this instance without validation.
	fn assign_attributes(&mut self, attributes: &ResolvedAttributes) -> FactoryResult<()>;

	/// Persists the instance. The factory always passes `validate = false`.
	fn save(&mut self, validate: bool) -> Result<(), Self::Error>;
}

/// Assigns attributes to a serde model by round-tripping it through JSON.
///
/// Attributes unknown to the model are ignored (unless the model denies
/// unknown fields); missing attributes keep their current values.
///
/// # Errors
///
/// Returns [`FactoryError::Assignment`] if the model does not serialize to
/// an object or the merged object no longer deserializes.
pub fn assign_with_serde<M>(model: &mut M, attributes: &ResolvedAttributes) -> FactoryResult<()>
where
	M: Serialize + DeserializeOwned,
{
	let model_name = std::any::type_name::<M>();
	let mut current = match serde_json::to_value(&*model)? {
		Value::Object(map) => map,
		other => {
			return Err(FactoryError::Assignment {
				model: model_name.to_string(),
				message: format!("model serialized to {} instead of an object", other),
			});
		}
	};

	for (key, value) in attributes {
		current.insert(key.clone(), value.clone());
	}

	*model = serde_json::from_value(Value::Object(current)).map_err(|e| {
		FactoryError::Assignment {
			model: model_name.to_string(),
			message: e.to_string(),
		}
	})?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;
	use serde_json::json;

	#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
	struct Article {
		id: Option<i64>,
		title: String,
		views: u32,
	}

	#[rstest]
	fn test_assign_with_serde_overwrites_known_fields() {
		let mut article = Article {
			id: None,
			title: "draft".to_string(),
			views: 3,
		};
		let attributes = json!({"title": "published", "unknown": true});

		assign_with_serde(&mut article, attributes.as_object().unwrap()).unwrap();

		assert_eq!(article.title, "published");
		assert_eq!(article.views, 3);
	}

	#[rstest]
	fn test_assign_with_serde_type_mismatch() {
		let mut article = Article::default();
		let attributes = json!({"views": "many"});

		let result = assign_with_serde(&mut article, attributes.as_object().unwrap());

		assert!(matches!(result, Err(FactoryError::Assignment { .. })));
		assert_eq!(article, Article::default());
	}

	#[rstest]
	fn test_assign_with_serde_requires_object_model() {
		let mut value = 5u32;
		let result = assign_with_serde(&mut value, &ResolvedAttributes::new());
		assert!(matches!(result, Err(FactoryError::Assignment { .. })));
	}
}
