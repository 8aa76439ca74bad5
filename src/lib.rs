//! # Muffin
//!
//! Blueprint-driven test fixture factories.
//!
//! Muffin builds fully populated model instances for test suites from
//! registered blueprints, layered states and caller overrides, and can
//! persist them through the model's own save operation with hooks around
//! every save.
//!
//! ## Feature Flags
//!
//! - `yaml` - YAML definition files
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```ignore
//! use muffin::prelude::*;
//!
//! let factory = Factory::new();
//! factory.define::<User, _>(|generator, _| attributes! {
//!     "name" => generator.fake::<String, _>(fake::faker::name::en::Name()),
//! });
//!
//! let users = factory.of::<User>().times(3).create(attributes! {})?;
//! ```
//!
//! See [`muffin_factory`] for the full API.

pub use muffin_factory::*;

/// Convenience re-exports for common usage.
pub mod prelude {
	pub use muffin_factory::prelude::*;
}
