//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use muffin_factory::prelude::*;
//! ```

pub use crate::attributes;
pub use crate::attributes::{Attribute, Attributes, ResolvedAttributes};
pub use crate::blueprint::State;
pub use crate::builder::{FactoryBuilder, LazyBuilder};
pub use crate::built::{Built, Raw};
pub use crate::error::{FactoryError, FactoryResult};
pub use crate::faker::FakerType;
pub use crate::generator::Generator;
pub use crate::hook::HookOverride;
pub use crate::model::{Identifiable, Model, assign_with_serde};
pub use crate::module::FixtureModule;
pub use crate::register_fixtures;
pub use crate::registry::Factory;
