//! Declarative definition files.
//!
//! Blueprints and states can be declared in JSON (or YAML, with the `yaml`
//! feature) and loaded with [`Factory::load`](crate::Factory::load):
//!
//! ```json
//! [
//!   {"model": "auth.User", "attributes": {"username": {"faker": "username"}, "active": true}},
//!   {"model": "auth.User", "state": "admin", "attributes": {"is_admin": true}}
//! ]
//! ```

mod format;
mod loader;
mod parser;
mod template;

pub use format::{DefinitionFile, DefinitionFormat, DefinitionRecord};
pub use loader::DefinitionLoader;
pub use parser::DefinitionParser;
pub use template::DefinitionTemplate;
