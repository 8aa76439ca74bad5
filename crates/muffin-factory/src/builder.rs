//! Per-operation instance builder.
//!
//! A [`FactoryBuilder`] is configured by chaining ([`times`], [`states`],
//! hook overrides) and then executed once with [`raw`], [`make`] or
//! [`create`]. It keeps a shared handle on the registry rather than a
//! snapshot, so definitions registered after the builder was obtained are
//! still seen at execution time.
//!
//! [`times`]: FactoryBuilder::times
//! [`states`]: FactoryBuilder::states
//! [`raw`]: FactoryBuilder::raw
//! [`make`]: FactoryBuilder::make
//! [`create`]: FactoryBuilder::create

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::attributes::{Attribute, Attributes, ResolvedAttributes};
use crate::built::{Built, Raw};
use crate::error::{FactoryError, FactoryResult};
use crate::generator::Generator;
use crate::hook::{Hook, HookOverride, HookSlot};
use crate::model::Model;
use crate::registry::Registry;
use crate::resolve::Resolver;

/// Configurable request that resolves, instantiates and stores models.
pub struct FactoryBuilder<M: Model> {
	registry: Arc<Registry>,
	name: String,
	active_states: Vec<String>,
	amount: Option<usize>,
	before_store: HookOverride<M>,
	after_store: HookOverride<M>,
}

impl<M: Model> FactoryBuilder<M> {
	pub(crate) fn new(registry: Arc<Registry>, name: impl Into<String>) -> Self {
		Self {
			registry,
			name: name.into(),
			active_states: Vec::new(),
			amount: None,
			before_store: HookOverride::Unset,
			after_store: HookOverride::Unset,
		}
	}

	/// Sets how many items to produce.
	///
	/// `1` still yields a single value; only counts above one yield a list.
	/// A count of `0` makes [`raw`](Self::raw) return an empty list and
	/// [`make`](Self::make)/[`create`](Self::create) a bare instance.
	pub fn times(mut self, amount: usize) -> Self {
		self.amount = Some(amount);
		self
	}

	/// Replaces the active states; they are applied in the given order.
	pub fn states<I, S>(mut self, states: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.active_states = states.into_iter().map(Into::into).collect();
		self
	}

	/// Runs `hook` instead of the registered before-store hook.
	pub fn before_store<F>(self, hook: F) -> Self
	where
		F: Fn(&mut M, &Generator) + Send + Sync + 'static,
	{
		self.before_store_override(HookOverride::custom(hook))
	}

	/// Runs `hook` instead of the registered after-store hook.
	pub fn after_store<F>(self, hook: F) -> Self
	where
		F: Fn(&mut M, &Generator) + Send + Sync + 'static,
	{
		self.after_store_override(HookOverride::custom(hook))
	}

	/// Skips the before-store hook, even if one is registered.
	pub fn without_before_store(self) -> Self {
		self.before_store_override(HookOverride::Disabled)
	}

	/// Skips the after-store hook, even if one is registered.
	pub fn without_after_store(self) -> Self {
		self.after_store_override(HookOverride::Disabled)
	}

	/// Sets the before-store override directly.
	pub fn before_store_override(mut self, hook: HookOverride<M>) -> Self {
		self.before_store = hook;
		self
	}

	/// Sets the after-store override directly.
	pub fn after_store_override(mut self, hook: HookOverride<M>) -> Self {
		self.after_store = hook;
		self
	}

	/// Registry key of the target model.
	pub fn model_id(&self) -> &'static str {
		M::model_id()
	}

	/// Blueprint name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Configured count, if any.
	pub fn amount(&self) -> Option<usize> {
		self.amount
	}

	/// Active states, in application order.
	pub fn active_states(&self) -> &[String] {
		&self.active_states
	}

	/// Resolves attribute mappings without instantiating anything.
	///
	/// # Errors
	///
	/// Fails with [`FactoryError::UndefinedBlueprint`] or
	/// [`FactoryError::UndefinedState`] when a definition is missing, or with
	/// any error raised while expanding deferred values.
	pub fn raw(&self, overrides: Attributes) -> FactoryResult<Raw> {
		self.log_operation("raw");
		match self.amount {
			None | Some(1) => self.resolve(&overrides).map(Raw::Single),
			Some(n) => (0..n)
				.map(|_| self.resolve(&overrides))
				.collect::<FactoryResult<Vec<_>>>()
				.map(Raw::Many),
		}
	}

	/// Instantiates models from resolved mappings without storing them.
	///
	/// # Errors
	///
	/// Fails with [`FactoryError::UndefinedBlueprint`] when the blueprint is
	/// missing, checked before anything else (also for a zero count).
	pub fn make(&self, overrides: Attributes) -> FactoryResult<Built<M>> {
		self.resolver().blueprint()?;
		self.log_operation("make");

		match self.amount {
			None | Some(1) => self.make_one(&overrides).map(Built::Single),
			Some(0) => Ok(Built::Bare(M::default())),
			Some(n) => (0..n)
				.map(|_| self.make_one(&overrides))
				.collect::<FactoryResult<Vec<_>>>()
				.map(Built::Many),
		}
	}

	/// Instantiates and stores models, returning what [`make`](Self::make)
	/// would have returned.
	///
	/// # Errors
	///
	/// Any [`make`](Self::make) error, or [`FactoryError::Persistence`] from
	/// the first failing save. Instances stored before the failure stay
	/// stored.
	pub fn create(&self, overrides: Attributes) -> FactoryResult<Built<M>> {
		let mut built = self.make(overrides)?;
		self.log_operation("create");
		self.store(built.as_mut_slice())?;
		Ok(built)
	}

	/// Defers [`create`](Self::create) until the result is needed.
	pub fn lazy(self, overrides: Attributes) -> LazyBuilder<M> {
		LazyBuilder {
			builder: self,
			overrides,
		}
	}

	pub(crate) fn make_one(&self, overrides: &Attributes) -> FactoryResult<M> {
		let attributes = self.resolve(overrides)?;
		let mut instance = M::default();
		instance.assign_attributes(&attributes)?;
		Ok(instance)
	}

	pub(crate) fn create_one(&self, overrides: &Attributes) -> FactoryResult<M> {
		let mut instance = self.make_one(overrides)?;
		self.store(std::slice::from_mut(&mut instance))?;
		Ok(instance)
	}

	fn resolver(&self) -> Resolver<'_> {
		Resolver::new(&self.registry, M::model_id(), &self.name, &self.active_states)
	}

	fn resolve(&self, overrides: &Attributes) -> FactoryResult<ResolvedAttributes> {
		self.resolver().resolve(overrides)
	}

	fn store(&self, instances: &mut [M]) -> FactoryResult<()> {
		let model = M::model_id();
		for (index, instance) in instances.iter_mut().enumerate() {
			if let Some(hook) = self.hook(HookSlot::BeforeStore) {
				trace!(model, index, "Running before_store hook");
				hook(instance, self.registry.generator());
			}

			trace!(model, index, "Saving instance");
			instance
				.save(false)
				.map_err(|e| FactoryError::Persistence {
					model: model.to_string(),
					source: Box::new(e),
				})?;

			if let Some(hook) = self.hook(HookSlot::AfterStore) {
				trace!(model, index, "Running after_store hook");
				hook(instance, self.registry.generator());
			}
		}
		Ok(())
	}

	fn hook(&self, slot: HookSlot) -> Option<Hook<M>> {
		let hook = match slot {
			HookSlot::BeforeStore => &self.before_store,
			HookSlot::AfterStore => &self.after_store,
		};
		hook.resolve(|| self.registry.hook::<M>(slot))
	}

	fn log_operation(&self, operation: &str) {
		debug!(
			model = M::model_id(),
			blueprint = %self.name,
			amount = ?self.amount,
			states = ?self.active_states,
			"Factory {}",
			operation
		);
	}
}

impl<M: Model> Clone for FactoryBuilder<M> {
	fn clone(&self) -> Self {
		Self {
			registry: Arc::clone(&self.registry),
			name: self.name.clone(),
			active_states: self.active_states.clone(),
			amount: self.amount,
			before_store: self.before_store.clone(),
			after_store: self.after_store.clone(),
		}
	}
}

impl<M: Model> fmt::Debug for FactoryBuilder<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryBuilder")
			.field("model", &M::model_id())
			.field("name", &self.name)
			.field("active_states", &self.active_states)
			.field("amount", &self.amount)
			.field("before_store", &self.before_store)
			.field("after_store", &self.after_store)
			.finish()
	}
}

/// A deferred [`FactoryBuilder::create`].
///
/// Used as an attribute value it creates the related record during
/// resolution and stands in for its primary key.
pub struct LazyBuilder<M: Model> {
	builder: FactoryBuilder<M>,
	overrides: Attributes,
}

impl<M: Model> LazyBuilder<M> {
	/// Performs the deferred create.
	pub fn call(&self) -> FactoryResult<Built<M>> {
		self.builder.create(self.overrides.clone())
	}
}

impl<M: Model> Clone for LazyBuilder<M> {
	fn clone(&self) -> Self {
		Self {
			builder: self.builder.clone(),
			overrides: self.overrides.clone(),
		}
	}
}

impl<M: Model> fmt::Debug for LazyBuilder<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyBuilder")
			.field("builder", &self.builder)
			.field("overrides", &self.overrides)
			.finish()
	}
}

/// Creates through the builder's own factory, not the resolving one.
///
/// A builder keeps its factory alive, so a blueprint should declare
/// relations with [`Attribute::related`] rather than capture a builder.
impl<M: Model> From<LazyBuilder<M>> for Attribute {
	fn from(lazy: LazyBuilder<M>) -> Self {
		Attribute::Related(Arc::new(move |_| Ok(lazy.call()?.primary_key())))
	}
}

impl<M: Model> From<FactoryBuilder<M>> for Attribute {
	fn from(builder: FactoryBuilder<M>) -> Self {
		builder.lazy(Attributes::new()).into()
	}
}
