//! Results of terminal builder operations.

use serde_json::Value;

use crate::attributes::ResolvedAttributes;
use crate::model::Identifiable;

/// Instances produced by [`make`](crate::FactoryBuilder::make) or
/// [`create`](crate::FactoryBuilder::create).
///
/// The shape follows the builder's count: unset or `1` yields a single
/// instance, more than one yields a list, and `0` yields a bare
/// default-constructed instance with no attributes assigned and nothing
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Built<M> {
	/// One populated instance.
	Single(M),
	/// Several populated instances, in production order.
	Many(Vec<M>),
	/// Default-constructed instance returned for a zero count.
	Bare(M),
}

impl<M> Built<M> {
	/// Number of instances held.
	pub fn len(&self) -> usize {
		match self {
			Self::Single(_) | Self::Bare(_) => 1,
			Self::Many(items) => items.len(),
		}
	}

	/// Returns `true` for an empty list.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns `true` for [`Built::Single`].
	pub fn is_single(&self) -> bool {
		matches!(self, Self::Single(_))
	}

	/// Returns `true` for [`Built::Many`].
	pub fn is_many(&self) -> bool {
		matches!(self, Self::Many(_))
	}

	/// Returns `true` for [`Built::Bare`].
	pub fn is_bare(&self) -> bool {
		matches!(self, Self::Bare(_))
	}

	/// Returns the single (or bare) instance, or `None` for a list.
	pub fn into_single(self) -> Option<M> {
		match self {
			Self::Single(item) | Self::Bare(item) => Some(item),
			Self::Many(_) => None,
		}
	}

	/// Flattens into a list regardless of shape.
	pub fn into_vec(self) -> Vec<M> {
		match self {
			Self::Single(item) | Self::Bare(item) => vec![item],
			Self::Many(items) => items,
		}
	}

	/// Iterates over the held instances.
	pub fn iter(&self) -> std::slice::Iter<'_, M> {
		match self {
			Self::Single(item) | Self::Bare(item) => std::slice::from_ref(item).iter(),
			Self::Many(items) => items.iter(),
		}
	}

	pub(crate) fn as_mut_slice(&mut self) -> &mut [M] {
		match self {
			Self::Single(item) | Self::Bare(item) => std::slice::from_mut(item),
			Self::Many(items) => items.as_mut_slice(),
		}
	}
}

impl<M: Identifiable> Built<M> {
	/// Primary key of the result; a JSON array of keys for a list.
	pub fn primary_key(&self) -> Value {
		match self {
			Self::Single(item) | Self::Bare(item) => item.primary_key(),
			Self::Many(items) => Value::Array(items.iter().map(Identifiable::primary_key).collect()),
		}
	}
}

impl<M> IntoIterator for Built<M> {
	type Item = M;
	type IntoIter = std::vec::IntoIter<M>;

	fn into_iter(self) -> Self::IntoIter {
		self.into_vec().into_iter()
	}
}

/// Attribute mappings produced by [`raw`](crate::FactoryBuilder::raw).
#[derive(Debug, Clone, PartialEq)]
pub enum Raw {
	/// One mapping (count unset or `1`).
	Single(ResolvedAttributes),
	/// Several mappings; empty for a zero count.
	Many(Vec<ResolvedAttributes>),
}

impl Raw {
	/// Number of mappings held.
	pub fn len(&self) -> usize {
		match self {
			Self::Single(_) => 1,
			Self::Many(items) => items.len(),
		}
	}

	/// Returns `true` when no mapping was produced.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the single mapping, or `None` for a list.
	pub fn into_single(self) -> Option<ResolvedAttributes> {
		match self {
			Self::Single(attributes) => Some(attributes),
			Self::Many(_) => None,
		}
	}

	/// Flattens into a list regardless of shape.
	pub fn into_vec(self) -> Vec<ResolvedAttributes> {
		match self {
			Self::Single(attributes) => vec![attributes],
			Self::Many(items) => items,
		}
	}
}
