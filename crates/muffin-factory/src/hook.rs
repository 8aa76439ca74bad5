//! Store hooks and their per-builder overrides.

use std::fmt;
use std::sync::Arc;

use crate::generator::Generator;

/// Callback run around [`Model::save`](crate::Model::save).
pub type Hook<M> = Arc<dyn Fn(&mut M, &Generator) + Send + Sync>;

/// Which side of the save a hook runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSlot {
	/// Runs before the instance is saved.
	BeforeStore,
	/// Runs after the instance is saved.
	AfterStore,
}

impl fmt::Display for HookSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::BeforeStore => f.write_str("before_store"),
			Self::AfterStore => f.write_str("after_store"),
		}
	}
}

/// Builder-level override of a registry hook.
pub enum HookOverride<M> {
	/// Use the hook registered on the factory, if any.
	Unset,
	/// Run no hook at all, even if one is registered.
	Disabled,
	/// Run this hook instead of the registered one.
	Custom(Hook<M>),
}

impl<M> HookOverride<M> {
	/// Wraps a closure as a custom override.
	pub fn custom<F>(hook: F) -> Self
	where
		F: Fn(&mut M, &Generator) + Send + Sync + 'static,
		M: 'static,
	{
		Self::Custom(Arc::new(hook))
	}

	/// Picks the hook to run; `registered` is only consulted when unset.
	pub fn resolve(&self, registered: impl FnOnce() -> Option<Hook<M>>) -> Option<Hook<M>> {
		match self {
			Self::Unset => registered(),
			Self::Disabled => None,
			Self::Custom(hook) => Some(Arc::clone(hook)),
		}
	}

	/// Returns `true` for [`HookOverride::Unset`].
	pub fn is_unset(&self) -> bool {
		matches!(self, Self::Unset)
	}
}

impl<M> Default for HookOverride<M> {
	fn default() -> Self {
		Self::Unset
	}
}

impl<M> Clone for HookOverride<M> {
	fn clone(&self) -> Self {
		match self {
			Self::Unset => Self::Unset,
			Self::Disabled => Self::Disabled,
			Self::Custom(hook) => Self::Custom(Arc::clone(hook)),
		}
	}
}

impl<M> fmt::Debug for HookOverride<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unset => f.write_str("Unset"),
			Self::Disabled => f.write_str("Disabled"),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}
