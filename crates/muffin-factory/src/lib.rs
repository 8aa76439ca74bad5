//! Blueprint-driven test fixture factories.
//!
//! This crate produces fully populated model instances for test suites:
//!
//! - **Blueprints**: named generator functions producing a model's default attributes
//! - **States**: named partial mappings layered on top of a blueprint
//! - **Builders**: per-call configuration of count, states and store hooks
//! - **Definition files**: blueprints and states declared in JSON/YAML
//!
//! # Features
//!
//! - `yaml` - YAML definition file support
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```ignore
//! use muffin_factory::prelude::*;
//! use fake::faker::internet::en::SafeEmail;
//!
//! let factory = Factory::new();
//!
//! factory
//!     .define::<User, _>(|generator, _| {
//!         attributes! {
//!             "email" => generator.fake::<String, _>(SafeEmail()),
//!             "is_admin" => false,
//!         }
//!     })
//!     .state::<User>("admin", attributes! { "is_admin" => true })
//!     .define::<Post, _>(|_, _| {
//!         attributes! {
//!             "title" => "Hello",
//!             "user_id" => Attribute::related::<User>(),
//!         }
//!     });
//!
//! let admin: User = factory.of::<User>().states(["admin"]).create(attributes! {})?.into_single().unwrap();
//! let posts = factory.of::<Post>().times(3).create(attributes! {})?;
//! ```
//!
//! # Resolution
//!
//! Every produced item is resolved independently:
//!
//! 1. the blueprint runs with the shared [`Generator`] and the caller's overrides
//! 2. active states are merged on top, in order
//! 3. the caller's overrides are merged last and always win
//! 4. deferred values are expanded in mapping order: computed values are
//!    called, related records are created by the resolving factory and
//!    replaced by their primary key, existing instances are replaced by
//!    their primary key
//!
//! The resulting [`ResolvedAttributes`] are assigned to a fresh
//! `M::default()` through [`Model::assign_attributes`]. [`create`] then
//! saves each instance in turn, running the before/after store hooks around
//! every save.
//!
//! [`create`]: FactoryBuilder::create

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod attributes;
pub mod blueprint;
pub mod builder;
pub mod built;
pub mod config;
pub mod definitions;
pub mod error;
pub mod faker;
pub mod generator;
pub mod hook;
pub mod model;
pub mod module;
pub mod prelude;
pub mod registry;

mod resolve;

// Re-export commonly used types at crate root
pub use attributes::{Attribute, Attributes, ResolvedAttributes};
pub use blueprint::{Blueprint, DEFAULT_BLUEPRINT, State};
pub use builder::{FactoryBuilder, LazyBuilder};
pub use built::{Built, Raw};
pub use config::FactoryConfig;
pub use error::{BoxError, FactoryError, FactoryResult};
pub use faker::FakerType;
pub use generator::Generator;
pub use hook::{Hook, HookOverride, HookSlot};
pub use model::{Identifiable, Model, assign_with_serde};
pub use module::{FixtureModule, FixtureRegistration};
pub use registry::Factory;

#[doc(hidden)]
pub use inventory;
