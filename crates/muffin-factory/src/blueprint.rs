//! Blueprint and state definitions stored in the registry.

use std::fmt;
use std::sync::Arc;

use crate::attributes::Attributes;
use crate::generator::Generator;

/// Name of the blueprint used when none is given.
pub const DEFAULT_BLUEPRINT: &str = "default";

/// Generator of a model's base attributes.
///
/// Receives the shared generator and the caller's overrides. Blueprints are
/// invoked once per produced item and never mutated by resolution.
pub type Blueprint = Arc<dyn Fn(&Generator, &Attributes) -> Attributes + Send + Sync>;

/// Named partial mapping layered on top of a blueprint.
#[derive(Clone)]
pub enum State {
	/// Fixed attributes, merged as-is.
	Static(Attributes),
	/// Attributes computed from the generator and the caller's overrides.
	Computed(Blueprint),
}

impl State {
	/// Wraps a closure as a computed state.
	pub fn computed<F>(f: F) -> Self
	where
		F: Fn(&Generator, &Attributes) -> Attributes + Send + Sync + 'static,
	{
		Self::Computed(Arc::new(f))
	}

	/// Produces this state's attributes.
	pub fn attributes(&self, generator: &Generator, overrides: &Attributes) -> Attributes {
		match self {
			Self::Static(attributes) => attributes.clone(),
			Self::Computed(f) => f(generator, overrides),
		}
	}
}

impl From<Attributes> for State {
	fn from(attributes: Attributes) -> Self {
		Self::Static(attributes)
	}
}

impl fmt::Debug for State {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(attributes) => f.debug_tuple("Static").field(attributes).finish(),
			Self::Computed(_) => f.write_str("Computed(..)"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_static_state_returns_copy() {
		let state = State::from(crate::attributes! { "is_admin" => true });
		let generator = Generator::new();

		let first = state.attributes(&generator, &Attributes::new());
		let second = state.attributes(&generator, &Attributes::new());

		assert_eq!(first.value("is_admin"), Some(&json!(true)));
		assert_eq!(second.len(), 1);
	}

	#[rstest]
	fn test_computed_state_sees_overrides() {
		let state = State::computed(|_, overrides| {
			let name = overrides
				.value("name")
				.and_then(|v| v.as_str())
				.unwrap_or("anonymous")
				.to_uppercase();
			crate::attributes! { "display" => name }
		});

		let attrs = state.attributes(&Generator::new(), &crate::attributes! { "name" => "ada" });
		assert_eq!(attrs.value("display"), Some(&json!("ADA")));
	}
}
