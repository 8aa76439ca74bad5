//! Blueprint registry and the [`Factory`] entry point.
//!
//! The registry stores, per model id, named blueprints, named states and
//! the two default store hooks. A [`Factory`] is a cheap, cloneable handle
//! on one registry; every builder it hands out shares the same registry.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::attributes::{Attributes, ResolvedAttributes};
use crate::blueprint::{Blueprint, DEFAULT_BLUEPRINT, State};
use crate::builder::FactoryBuilder;
use crate::config::FactoryConfig;
use crate::definitions::DefinitionLoader;
use crate::error::FactoryResult;
use crate::generator::Generator;
use crate::hook::{Hook, HookSlot};
use crate::model::Model;
use crate::module::{FixtureModule, FixtureRegistration};
use crate::resolve::Resolver;

/// Hook stored without its model type; always holds a `Hook<M>`.
type ErasedHook = Arc<dyn Any + Send + Sync>;

type NamedMap<T> = RwLock<HashMap<String, HashMap<String, T>>>;

/// Shared storage behind a [`Factory`].
#[derive(Default)]
pub(crate) struct Registry {
	definitions: NamedMap<Blueprint>,
	states: NamedMap<State>,
	before_store: RwLock<HashMap<String, ErasedHook>>,
	after_store: RwLock<HashMap<String, ErasedHook>>,
	generator: Generator,
}

impl Registry {
	fn with_generator(generator: Generator) -> Self {
		Self {
			generator,
			..Default::default()
		}
	}

	pub(crate) fn generator(&self) -> &Generator {
		&self.generator
	}

	pub(crate) fn blueprint(&self, model: &str, name: &str) -> Option<Blueprint> {
		self.definitions
			.read()
			.get(model)
			.and_then(|blueprints| blueprints.get(name))
			.cloned()
	}

	pub(crate) fn has_blueprint(&self, model: &str, name: &str) -> bool {
		self.definitions
			.read()
			.get(model)
			.is_some_and(|blueprints| blueprints.contains_key(name))
	}

	pub(crate) fn state(&self, model: &str, name: &str) -> Option<State> {
		self.states
			.read()
			.get(model)
			.and_then(|states| states.get(name))
			.cloned()
	}

	pub(crate) fn hook<M: Model>(&self, slot: HookSlot) -> Option<Hook<M>> {
		let erased = self.hooks(slot).read().get(M::model_id()).cloned()?;
		let hook = erased.downcast_ref::<Hook<M>>().cloned();
		if hook.is_none() {
			warn!(
				model = M::model_id(),
				%slot,
				"Registered hook belongs to another type with the same model id; skipping"
			);
		}
		hook
	}

	fn hooks(&self, slot: HookSlot) -> &RwLock<HashMap<String, ErasedHook>> {
		match slot {
			HookSlot::BeforeStore => &self.before_store,
			HookSlot::AfterStore => &self.after_store,
		}
	}

	fn insert_blueprint(&self, model: &str, name: &str, blueprint: Blueprint) {
		debug!(model, blueprint = name, "Defining blueprint");
		self.definitions
			.write()
			.entry(model.to_string())
			.or_default()
			.insert(name.to_string(), blueprint);
	}

	fn insert_state(&self, model: &str, name: &str, state: State) {
		debug!(model, state = name, "Defining state");
		self.states
			.write()
			.entry(model.to_string())
			.or_default()
			.insert(name.to_string(), state);
	}

	fn insert_hook<M: Model>(&self, slot: HookSlot, hook: Hook<M>) {
		debug!(model = M::model_id(), %slot, "Registering hook");
		self.hooks(slot)
			.write()
			.insert(M::model_id().to_string(), Arc::new(hook));
	}

	fn remove_blueprints(&self, model: &str) -> bool {
		self.definitions.write().remove(model).is_some()
	}

	fn model_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.definitions.read().keys().cloned().collect();
		ids.sort();
		ids
	}
}

/// Registry of model blueprints and the entry point for building fixtures.
///
/// # Example
///
/// ```
/// use muffin_factory::{Factory, FactoryResult, Identifiable, Model, ResolvedAttributes, attributes};
/// use serde_json::{Value, json};
///
/// #[derive(Debug, Default)]
/// struct Tag {
///     id: Option<i64>,
///     label: String,
/// }
///
/// impl Identifiable for Tag {
///     fn primary_key(&self) -> Value {
///         json!(self.id)
///     }
/// }
///
/// impl Model for Tag {
///     type Error = std::io::Error;
///
///     fn assign_attributes(&mut self, attributes: &ResolvedAttributes) -> FactoryResult<()> {
///         if let Some(label) = attributes.get("label").and_then(Value::as_str) {
///             self.label = label.to_string();
///         }
///         Ok(())
///     }
///
///     fn save(&mut self, _validate: bool) -> Result<(), Self::Error> {
///         self.id = Some(1);
///         Ok(())
///     }
/// }
///
/// let factory = Factory::with_seed(7);
/// factory.define::<Tag, _>(|_, _| attributes! { "label" => "rust" });
///
/// let tag: Tag = factory.create(attributes! {})?;
/// assert_eq!(tag.label, "rust");
/// assert_eq!(tag.id, Some(1));
/// # Ok::<(), muffin_factory::FactoryError>(())
/// ```
#[derive(Clone)]
pub struct Factory {
	registry: Arc<Registry>,
}

impl Factory {
	/// Creates an empty factory with an entropy-seeded generator.
	pub fn new() -> Self {
		Self::with_generator(Generator::new())
	}

	/// Creates an empty factory whose generator is seeded with `seed`.
	pub fn with_seed(seed: u64) -> Self {
		Self::with_generator(Generator::seeded(seed))
	}

	/// Creates an empty factory around `generator`.
	pub fn with_generator(generator: Generator) -> Self {
		Self {
			registry: Arc::new(Registry::with_generator(generator)),
		}
	}

	pub(crate) fn from_registry(registry: Arc<Registry>) -> Self {
		Self { registry }
	}

	/// Creates a factory from configuration.
	///
	/// Seeds the generator when a seed is configured and loads the
	/// configured definitions directory, if any.
	pub fn from_config(config: &FactoryConfig) -> FactoryResult<Self> {
		let factory = match config.seed {
			Some(seed) => Self::with_seed(seed),
			None => Self::new(),
		};
		if let Some(path) = &config.definitions_path {
			let loader = DefinitionLoader::new().with_max_depth(config.max_depth);
			loader.load(&factory, path)?;
		}
		Ok(factory)
	}

	/// The generator shared by every blueprint, state and hook.
	pub fn generator(&self) -> &Generator {
		self.registry.generator()
	}

	/// Defines the default blueprint for `M`.
	pub fn define<M, F>(&self, blueprint: F) -> &Self
	where
		M: Model,
		F: Fn(&Generator, &Attributes) -> Attributes + Send + Sync + 'static,
	{
		self.define_named::<M, F>(DEFAULT_BLUEPRINT, blueprint)
	}

	/// Defines a named blueprint for `M`, replacing any previous one.
	pub fn define_named<M, F>(&self, name: &str, blueprint: F) -> &Self
	where
		M: Model,
		F: Fn(&Generator, &Attributes) -> Attributes + Send + Sync + 'static,
	{
		self.define_for(M::model_id(), name, blueprint)
	}

	/// Alias of [`define_named`](Self::define_named).
	pub fn define_as<M, F>(&self, name: &str, blueprint: F) -> &Self
	where
		M: Model,
		F: Fn(&Generator, &Attributes) -> Attributes + Send + Sync + 'static,
	{
		self.define_named::<M, F>(name, blueprint)
	}

	/// Defines a named blueprint by model id.
	pub fn define_for<F>(&self, model_id: &str, name: &str, blueprint: F) -> &Self
	where
		F: Fn(&Generator, &Attributes) -> Attributes + Send + Sync + 'static,
	{
		self.registry
			.insert_blueprint(model_id, name, Arc::new(blueprint));
		self
	}

	/// Same as [`define`](Self::define).
	pub fn set<M, F>(&self, blueprint: F) -> &Self
	where
		M: Model,
		F: Fn(&Generator, &Attributes) -> Attributes + Send + Sync + 'static,
	{
		self.define::<M, F>(blueprint)
	}

	/// Defines a named state for `M`.
	pub fn state<M: Model>(&self, name: &str, state: impl Into<State>) -> &Self {
		self.state_for(M::model_id(), name, state)
	}

	/// Defines a named state by model id.
	pub fn state_for(&self, model_id: &str, name: &str, state: impl Into<State>) -> &Self {
		self.registry.insert_state(model_id, name, state.into());
		self
	}

	/// Sets the default hook run before each `M` is saved.
	pub fn before_store<M, F>(&self, hook: F) -> &Self
	where
		M: Model,
		F: Fn(&mut M, &Generator) + Send + Sync + 'static,
	{
		self.registry
			.insert_hook::<M>(HookSlot::BeforeStore, Arc::new(hook));
		self
	}

	/// Sets the default hook run after each `M` is saved.
	pub fn after_store<M, F>(&self, hook: F) -> &Self
	where
		M: Model,
		F: Fn(&mut M, &Generator) + Send + Sync + 'static,
	{
		self.registry
			.insert_hook::<M>(HookSlot::AfterStore, Arc::new(hook));
		self
	}

	/// Returns a builder for the default blueprint of `M`.
	pub fn of<M: Model>(&self) -> FactoryBuilder<M> {
		self.of_named(DEFAULT_BLUEPRINT)
	}

	/// Returns a builder for a named blueprint of `M`.
	///
	/// The blueprint does not need to exist yet; it is looked up when the
	/// builder executes.
	pub fn of_named<M: Model>(&self, name: &str) -> FactoryBuilder<M> {
		FactoryBuilder::new(Arc::clone(&self.registry), name)
	}

	/// Creates and stores one `M` from the default blueprint.
	pub fn create<M: Model>(&self, overrides: Attributes) -> FactoryResult<M> {
		self.of::<M>().create_one(&overrides)
	}

	/// Creates and stores one `M` from a named blueprint.
	pub fn create_as<M: Model>(&self, name: &str, overrides: Attributes) -> FactoryResult<M> {
		self.of_named::<M>(name).create_one(&overrides)
	}

	/// Makes one unsaved `M` from the default blueprint.
	pub fn make<M: Model>(&self, overrides: Attributes) -> FactoryResult<M> {
		self.of::<M>().make_one(&overrides)
	}

	/// Makes one unsaved `M` from a named blueprint.
	pub fn make_as<M: Model>(&self, name: &str, overrides: Attributes) -> FactoryResult<M> {
		self.of_named::<M>(name).make_one(&overrides)
	}

	/// Makes one unsaved `M` from the default blueprint, without overrides.
	pub fn get_or_make<M: Model>(&self) -> FactoryResult<M> {
		self.make(Attributes::new())
	}

	/// Resolves one attribute mapping for a blueprint of `M`.
	pub fn raw_attributes<M: Model>(
		&self,
		name: &str,
		overrides: Attributes,
	) -> FactoryResult<ResolvedAttributes> {
		self.raw_attributes_for(M::model_id(), name, overrides)
	}

	/// Resolves one attribute mapping for a blueprint, by model id.
	pub fn raw_attributes_for(
		&self,
		model_id: &str,
		name: &str,
		overrides: Attributes,
	) -> FactoryResult<ResolvedAttributes> {
		Resolver::new(&self.registry, model_id, name, &[]).resolve(&overrides)
	}

	/// Registers every definition file found under `path`.
	///
	/// Scans recursively. A path that is not a directory registers nothing.
	/// Returns the number of blueprints and states registered.
	pub fn load(&self, path: impl AsRef<Path>) -> FactoryResult<usize> {
		DefinitionLoader::new().load(self, path.as_ref())
	}

	/// Runs a fixture module against this factory.
	pub fn register<T: FixtureModule + ?Sized>(&self, module: &T) -> &Self {
		debug!(module = module.name(), "Registering fixture module");
		module.register(self);
		self
	}

	/// Runs every fixture module submitted with
	/// [`register_fixtures!`](crate::register_fixtures).
	///
	/// Returns the number of modules run.
	pub fn discover(&self) -> usize {
		let mut count = 0;
		for registration in inventory::iter::<FixtureRegistration> {
			self.register(registration);
			count += 1;
		}
		info!("Discovered {} fixture modules", count);
		count
	}

	/// Returns `true` if `M` has a default blueprint.
	pub fn has<M: Model>(&self) -> bool {
		self.has_for(M::model_id())
	}

	/// Returns `true` if the model id has a default blueprint.
	pub fn has_for(&self, model_id: &str) -> bool {
		self.registry.has_blueprint(model_id, DEFAULT_BLUEPRINT)
	}

	/// Returns `true` if the model id has a blueprint with this name.
	pub fn has_named(&self, model_id: &str, name: &str) -> bool {
		self.registry.has_blueprint(model_id, name)
	}

	/// Drops every blueprint of `M`. States and hooks are kept.
	pub fn remove<M: Model>(&self) -> bool {
		self.remove_for(M::model_id())
	}

	/// Drops every blueprint of a model id. States and hooks are kept.
	pub fn remove_for(&self, model_id: &str) -> bool {
		self.registry.remove_blueprints(model_id)
	}

	/// Model ids with at least one blueprint, sorted.
	pub fn model_ids(&self) -> Vec<String> {
		self.registry.model_ids()
	}
}

impl Default for Factory {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Factory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Factory")
			.field("models", &self.model_ids())
			.field("generator", self.generator())
			.finish()
	}
}
