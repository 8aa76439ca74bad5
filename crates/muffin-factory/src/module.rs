//! Fixture modules: code that registers definitions on a [`Factory`].
//!
//! Modules can be registered explicitly with [`Factory::register`] or
//! submitted at link time with [`register_fixtures!`](crate::register_fixtures)
//! and picked up by [`Factory::discover`].

use crate::registry::Factory;

/// A unit of definitions registered as a group.
pub trait FixtureModule {
	/// Name used in log output.
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// Registers blueprints, states and hooks on `factory`.
	fn register(&self, factory: &Factory);
}

/// Module submitted to the link-time inventory.
#[derive(Debug, Clone, Copy)]
pub struct FixtureRegistration {
	name: &'static str,
	register: fn(&Factory),
}

impl FixtureRegistration {
	/// Creates a registration; usable in `static` context.
	pub const fn new(name: &'static str, register: fn(&Factory)) -> Self {
		Self { name, register }
	}
}

impl FixtureModule for FixtureRegistration {
	fn name(&self) -> &str {
		self.name
	}

	fn register(&self, factory: &Factory) {
		(self.register)(factory)
	}
}

inventory::collect!(FixtureRegistration);

/// Submits a registration function for [`Factory::discover`].
///
/// ```
/// use muffin_factory::{Factory, register_fixtures};
///
/// fn tags(factory: &Factory) {
///     factory.define_for("blog.Tag", "default", |_, _| muffin_factory::attributes! { "label" => "rust" });
/// }
///
/// register_fixtures!("tags", tags);
///
/// let factory = Factory::new();
/// factory.discover();
/// assert!(factory.has_for("blog.Tag"));
/// ```
#[macro_export]
macro_rules! register_fixtures {
	($name:expr, $register:path) => {
		$crate::inventory::submit! {
			$crate::FixtureRegistration::new($name, $register)
		}
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attributes;
	use rstest::rstest;

	struct Catalog;

	impl FixtureModule for Catalog {
		fn register(&self, factory: &Factory) {
			factory.define_for("shop.Item", "default", |_, _| attributes! { "sku" => "A-1" });
		}
	}

	fn discounts(factory: &Factory) {
		factory.define_for("shop.Discount", "default", |_, _| attributes! { "rate" => 0.1 });
	}

	crate::register_fixtures!("discounts", discounts);

	#[rstest]
	fn test_register_module() {
		let factory = Factory::new();
		factory.register(&Catalog);

		assert!(factory.has_for("shop.Item"));
		assert!(Catalog.name().ends_with("Catalog"));
	}

	#[rstest]
	fn test_discover_runs_submitted_modules() {
		let factory = Factory::new();
		let count = factory.discover();

		assert!(count >= 1);
		assert!(factory.has_for("shop.Discount"));
	}
}
