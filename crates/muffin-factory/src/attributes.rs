//! Attribute values and ordered attribute mappings.
//!
//! Blueprints, states and caller overrides all produce [`Attributes`]: an
//! insertion-ordered map from attribute name to [`Attribute`]. An attribute
//! is either a literal JSON value or something deferred until resolution:
//! a computation over the mapping, a related record created by the factory
//! doing the resolving, or an existing instance whose primary key should be
//! used.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter};
use serde_json::Value;

use crate::blueprint::DEFAULT_BLUEPRINT;
use crate::error::{FactoryError, FactoryResult};
use crate::model::{Identifiable, Model};
use crate::registry::Factory;

/// Fully resolved attribute mapping, ready to be assigned to a model.
pub type ResolvedAttributes = serde_json::Map<String, Value>;

/// Deferred computation over the mapping resolved so far.
pub type ComputedFn = Arc<dyn Fn(&Attributes) -> Attribute + Send + Sync>;

/// Deferred creation of a related record, yielding its primary key.
///
/// Receives the factory whose resolution is running.
pub type RelatedFn = Arc<dyn Fn(&Factory) -> FactoryResult<Value> + Send + Sync>;

/// A single attribute value.
#[derive(Clone)]
pub enum Attribute {
	/// Concrete value.
	Literal(Value),
	/// Computed from the mapping at resolution time.
	///
	/// Entries before this one are already resolved when it runs; entries
	/// after it are not. The result may be a related builder or an instance,
	/// which is then replaced by its primary key, but a computation returning
	/// another computation is not run again.
	Computed(ComputedFn),
	/// Related record created at resolution time; resolves to its primary key.
	Related(RelatedFn),
	/// Existing record; resolves to its primary key.
	Instance(Arc<dyn Identifiable + Send + Sync>),
}

impl Attribute {
	/// Wraps a computation over the in-progress mapping.
	///
	/// ```
	/// use muffin_factory::{Attribute, attributes};
	///
	/// let full_name = Attribute::computed(|attrs| {
	///     format!(
	///         "{} {}",
	///         attrs.value("first").and_then(|v| v.as_str()).unwrap_or_default(),
	///         attrs.value("last").and_then(|v| v.as_str()).unwrap_or_default(),
	///     )
	/// });
	/// let attrs = attributes! { "first" => "Ada", "last" => "Lovelace", "full" => full_name };
	/// assert!(attrs.get("full").unwrap().is_deferred());
	/// ```
	pub fn computed<F, T>(f: F) -> Self
	where
		F: Fn(&Attributes) -> T + Send + Sync + 'static,
		T: Into<Attribute>,
	{
		Self::Computed(Arc::new(move |attributes| f(attributes).into()))
	}

	/// Related `M` created from its default blueprint at resolution time.
	///
	/// The record is created by whichever factory resolves the mapping, so a
	/// blueprint can declare relations without holding a [`Factory`] handle.
	///
	/// ```
	/// use muffin_factory::{Attribute, Factory, attributes};
	/// # use muffin_factory::{FactoryResult, Identifiable, Model, ResolvedAttributes};
	/// # use serde_json::{Value, json};
	/// # #[derive(Debug, Default)]
	/// # struct User { id: Option<i64> }
	/// # impl Identifiable for User {
	/// #     fn primary_key(&self) -> Value { json!(self.id) }
	/// # }
	/// # impl Model for User {
	/// #     type Error = std::io::Error;
	/// #     fn assign_attributes(&mut self, _: &ResolvedAttributes) -> FactoryResult<()> { Ok(()) }
	/// #     fn save(&mut self, _: bool) -> Result<(), Self::Error> { self.id = Some(7); Ok(()) }
	/// # }
	///
	/// let factory = Factory::new();
	/// factory.define::<User, _>(|_, _| attributes! {});
	/// factory.define_for("blog.Post", "default", |_, _| {
	///     attributes! { "user_id" => Attribute::related::<User>() }
	/// });
	///
	/// let raw = factory.raw_attributes_for("blog.Post", "default", attributes! {})?;
	/// assert_eq!(raw.get("user_id"), Some(&json!(7)));
	/// # Ok::<(), muffin_factory::FactoryError>(())
	/// ```
	pub fn related<M: Model>() -> Self {
		Self::related_with::<M>(DEFAULT_BLUEPRINT, Attributes::new())
	}

	/// Related `M` created from a named blueprint with `overrides`.
	pub fn related_with<M: Model>(name: impl Into<String>, overrides: Attributes) -> Self {
		let name = name.into();
		Self::Related(Arc::new(move |factory| {
			Ok(factory
				.of_named::<M>(&name)
				.create(overrides.clone())?
				.primary_key())
		}))
	}

	/// Wraps an existing record; it is replaced by its primary key.
	pub fn instance<I>(instance: I) -> Self
	where
		I: Identifiable + Send + Sync + 'static,
	{
		Self::Instance(Arc::new(instance))
	}

	/// Returns the literal value, if this attribute is already concrete.
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Literal(value) => Some(value),
			_ => None,
		}
	}

	/// Returns `true` unless the attribute is a literal.
	pub fn is_deferred(&self) -> bool {
		!matches!(self, Self::Literal(_))
	}
}

impl fmt::Debug for Attribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Computed(_) => f.write_str("Computed(..)"),
			Self::Related(_) => f.write_str("Related(..)"),
			Self::Instance(instance) => f
				.debug_tuple("Instance")
				.field(&instance.primary_key())
				.finish(),
		}
	}
}

impl From<Value> for Attribute {
	fn from(value: Value) -> Self {
		Self::Literal(value)
	}
}

macro_rules! literal_from {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Attribute {
				fn from(value: $ty) -> Self {
					Self::Literal(Value::from(value))
				}
			}
		)*
	};
}

literal_from!(
	bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str
);

impl<T> From<Option<T>> for Attribute
where
	T: Into<Value>,
{
	fn from(value: Option<T>) -> Self {
		Self::Literal(value.map_or(Value::Null, Into::into))
	}
}

impl<T> From<Vec<T>> for Attribute
where
	T: Into<Value>,
{
	fn from(values: Vec<T>) -> Self {
		Self::Literal(Value::Array(values.into_iter().map(Into::into).collect()))
	}
}

/// Insertion-ordered attribute mapping.
///
/// Inserting an existing key replaces its value but keeps its position, so
/// merging a state or override onto a blueprint preserves the blueprint's
/// attribute order.
#[derive(Clone, Default, Debug)]
pub struct Attributes {
	entries: IndexMap<String, Attribute>,
}

impl Attributes {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces an attribute.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: impl Into<Attribute>,
	) -> Option<Attribute> {
		self.entries.insert(key.into(), value.into())
	}

	/// Builder-style insert.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Attribute>) -> Self {
		self.insert(key, value);
		self
	}

	/// Returns the attribute for `key`.
	pub fn get(&self, key: &str) -> Option<&Attribute> {
		self.entries.get(key)
	}

	/// Returns the literal value for `key`, if it is concrete.
	pub fn value(&self, key: &str) -> Option<&Value> {
		self.get(key).and_then(Attribute::as_value)
	}

	/// Returns `true` if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Removes `key`, keeping the order of the remaining entries.
	pub fn remove(&mut self, key: &str) -> Option<Attribute> {
		self.entries.shift_remove(key)
	}

	/// Returns the number of attributes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if there are no attributes.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over the attribute names in order.
	pub fn keys(&self) -> impl Iterator<Item = &String> {
		self.entries.keys()
	}

	/// Iterates over the entries in order.
	pub fn iter(&self) -> Iter<'_, String, Attribute> {
		self.entries.iter()
	}

	/// Overlays `other` onto this mapping; keys in `other` win.
	pub fn merge(&mut self, other: Attributes) {
		for (key, value) in other.entries {
			self.entries.insert(key, value);
		}
	}

	/// Consuming form of [`merge`](Self::merge).
	pub fn merged(mut self, other: Attributes) -> Self {
		self.merge(other);
		self
	}

	/// Builds a literal mapping from a JSON object.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::ValidationError`] if `value` is not an object.
	pub fn from_json(value: Value) -> FactoryResult<Self> {
		match value {
			Value::Object(map) => Ok(map.into()),
			other => Err(FactoryError::ValidationError {
				field: "attributes".to_string(),
				message: format!("expected a JSON object, got {}", other),
			}),
		}
	}

	/// Converts into a resolved mapping if every attribute is a literal.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::UnresolvedAttribute`] for the first deferred
	/// attribute.
	pub fn into_resolved(self) -> FactoryResult<ResolvedAttributes> {
		self.entries
			.into_iter()
			.map(|(key, value)| match value {
				Attribute::Literal(value) => Ok((key, value)),
				_ => Err(FactoryError::UnresolvedAttribute { attribute: key }),
			})
			.collect()
	}
}

impl From<ResolvedAttributes> for Attributes {
	fn from(map: ResolvedAttributes) -> Self {
		map.into_iter()
			.map(|(key, value)| (key, Attribute::Literal(value)))
			.collect()
	}
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<String>,
	V: Into<Attribute>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attributes = Self::new();
		attributes.extend(iter);
		attributes
	}
}

impl<K, V> Extend<(K, V)> for Attributes
where
	K: Into<String>,
	V: Into<Attribute>,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl IntoIterator for Attributes {
	type Item = (String, Attribute);
	type IntoIter = IntoIter<String, Attribute>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<'a> IntoIterator for &'a Attributes {
	type Item = (&'a String, &'a Attribute);
	type IntoIter = Iter<'a, String, Attribute>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

/// Builds an [`Attributes`] mapping.
///
/// Values accept anything convertible into an [`Attribute`]: literals,
/// `serde_json::Value`s, [`Attribute::computed`] values, builders and lazy
/// builders.
///
/// ```
/// use muffin_factory::attributes;
///
/// let attrs = attributes! { "name" => "fixed", "age" => 30 };
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs.value("age"), Some(&serde_json::json!(30)));
/// ```
#[macro_export]
macro_rules! attributes {
	() => {
		$crate::Attributes::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut attributes = $crate::Attributes::new();
		$(
			attributes.insert($key, $value);
		)+
		attributes
	}};
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	struct Key(i64);

	impl Identifiable for Key {
		fn primary_key(&self) -> Value {
			json!(self.0)
		}
	}

	#[rstest]
	fn test_insert_keeps_first_position() {
		let mut attrs = crate::attributes! { "a" => 1, "b" => 2, "c" => 3 };
		attrs.insert("a", 10);

		let keys: Vec<&String> = attrs.keys().collect();
		assert_eq!(keys, ["a", "b", "c"]);
		assert_eq!(attrs.value("a"), Some(&json!(10)));
	}

	#[rstest]
	fn test_merge_overrides_and_appends() {
		let base = crate::attributes! { "name" => "base", "age" => 20 };
		let merged = base.merged(crate::attributes! { "age" => 30, "email" => "x@example.com" });

		let keys: Vec<&String> = merged.keys().collect();
		assert_eq!(keys, ["name", "age", "email"]);
		assert_eq!(merged.value("age"), Some(&json!(30)));
	}

	#[rstest]
	fn test_remove_preserves_order() {
		let mut attrs = crate::attributes! { "a" => 1, "b" => 2, "c" => 3 };
		attrs.remove("b");
		let keys: Vec<&String> = attrs.keys().collect();
		assert_eq!(keys, ["a", "c"]);
	}

	#[rstest]
	fn test_literal_conversions() {
		assert_eq!(Attribute::from("x").as_value(), Some(&json!("x")));
		assert_eq!(Attribute::from(true).as_value(), Some(&json!(true)));
		assert_eq!(Attribute::from(None::<i64>).as_value(), Some(&Value::Null));
		assert_eq!(Attribute::from(vec![1, 2]).as_value(), Some(&json!([1, 2])));
	}

	#[rstest]
	fn test_deferred_attributes_have_no_value() {
		let computed = Attribute::computed(|_| 1);
		let instance = Attribute::instance(Key(9));

		assert!(computed.is_deferred());
		assert!(computed.as_value().is_none());
		assert!(instance.is_deferred());
		assert_eq!(format!("{:?}", instance), "Instance(Number(9))");
	}

	#[rstest]
	fn test_from_json_requires_object() {
		let attrs = Attributes::from_json(json!({"name": "x", "age": 3})).unwrap();
		assert_eq!(attrs.len(), 2);

		let result = Attributes::from_json(json!([1, 2]));
		assert!(matches!(result, Err(FactoryError::ValidationError { .. })));
	}

	#[rstest]
	fn test_into_resolved_rejects_deferred() {
		let attrs = crate::attributes! { "name" => "x" };
		let resolved = attrs.into_resolved().unwrap();
		assert_eq!(Value::Object(resolved), json!({"name": "x"}));

		let attrs = crate::attributes! { "name" => "x", "age" => Attribute::computed(|_| 1) };
		let result = attrs.into_resolved();
		assert!(matches!(
			result,
			Err(FactoryError::UnresolvedAttribute { attribute }) if attribute == "age"
		));
	}
}
