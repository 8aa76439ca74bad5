//! Attribute resolution pipeline.
//!
//! `expand(merge(apply_states(blueprint(generator, overrides)), overrides))`
//!
//! The blueprint and every state run afresh for each resolved item, so
//! random values differ between items of a batch. Caller overrides are
//! merged last and always win.

use std::sync::Arc;

use crate::attributes::{Attribute, Attributes, ResolvedAttributes};
use crate::blueprint::Blueprint;
use crate::error::{FactoryError, FactoryResult};
use crate::registry::{Factory, Registry};

/// Resolves attributes for one `(model, blueprint, states)` combination.
pub(crate) struct Resolver<'a> {
	registry: &'a Arc<Registry>,
	model: &'a str,
	name: &'a str,
	states: &'a [String],
}

impl<'a> Resolver<'a> {
	pub(crate) fn new(
		registry: &'a Arc<Registry>,
		model: &'a str,
		name: &'a str,
		states: &'a [String],
	) -> Self {
		Self {
			registry,
			model,
			name,
			states,
		}
	}

	/// Looks up the blueprint, failing if it was never registered.
	pub(crate) fn blueprint(&self) -> FactoryResult<Blueprint> {
		self.registry
			.blueprint(self.model, self.name)
			.ok_or_else(|| FactoryError::UndefinedBlueprint {
				model: self.model.to_string(),
				name: self.name.to_string(),
			})
	}

	/// Produces one fully resolved attribute mapping.
	pub(crate) fn resolve(&self, overrides: &Attributes) -> FactoryResult<ResolvedAttributes> {
		let blueprint = self.blueprint()?;
		let definition = blueprint(self.registry.generator(), overrides);

		let mut attributes = self.apply_states(definition, overrides)?;
		attributes.merge(overrides.clone());

		self.expand_attributes(attributes)
	}

	/// Layers the active states onto `definition` in order.
	pub(crate) fn apply_states(
		&self,
		mut definition: Attributes,
		overrides: &Attributes,
	) -> FactoryResult<Attributes> {
		for name in self.states {
			let state = self.registry.state(self.model, name).ok_or_else(|| {
				FactoryError::UndefinedState {
					model: self.model.to_string(),
					state: name.clone(),
				}
			})?;
			definition.merge(state.attributes(self.registry.generator(), overrides));
		}
		Ok(definition)
	}

	/// Replaces every deferred value with a concrete one, in mapping order.
	///
	/// Computed values see the mapping as it stands: earlier entries are
	/// already concrete, later ones are not. A computed value may yield a
	/// related builder or an instance, which is then reduced to its primary
	/// key; a computed value yielding another computation is an error.
	pub(crate) fn expand_attributes(
		&self,
		mut attributes: Attributes,
	) -> FactoryResult<ResolvedAttributes> {
		let keys: Vec<String> = attributes.keys().cloned().collect();

		for key in keys {
			let current = match attributes.get(&key) {
				Some(Attribute::Literal(_)) | None => continue,
				Some(deferred) => deferred.clone(),
			};

			let expanded = match current {
				Attribute::Computed(compute) => compute(&attributes),
				other => other,
			};

			let value = match expanded {
				Attribute::Literal(value) => value,
				Attribute::Related(create) => {
					tracing::trace!(model = self.model, attribute = %key, "Creating related record");
					create(&Factory::from_registry(Arc::clone(self.registry)))?
				}
				Attribute::Instance(instance) => instance.primary_key(),
				Attribute::Computed(_) => {
					return Err(FactoryError::UnresolvedAttribute { attribute: key });
				}
			};

			attributes.insert(key, value);
		}

		attributes.into_resolved()
	}
}
