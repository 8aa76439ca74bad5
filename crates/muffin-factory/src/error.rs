//! Error types for the factory.
//!
//! Every terminal builder operation and every registry convenience returns a
//! [`FactoryResult`]. Nothing is retried internally: the first error aborts
//! the operation and side effects that already happened (stored instances,
//! hook calls) stay in place.

use thiserror::Error;

/// Boxed error used for failures reported by external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving, building or storing fixtures.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// No blueprint is registered for the model and name.
	#[error("Unable to locate blueprint [{name}] for [{model}]")]
	UndefinedBlueprint {
		/// Model identifier.
		model: String,
		/// Blueprint name.
		name: String,
	},

	/// An active state is not registered for the model.
	#[error("Unable to locate state [{state}] for [{model}]")]
	UndefinedState {
		/// Model identifier.
		model: String,
		/// State name.
		state: String,
	},

	/// The model failed to persist itself.
	#[error("Failed to store [{model}]: {source}")]
	Persistence {
		/// Model identifier.
		model: String,
		/// Error reported by the model's save operation.
		#[source]
		source: BoxError,
	},

	/// The model rejected the resolved attributes.
	#[error("Failed to assign attributes to [{model}]: {message}")]
	Assignment {
		/// Model identifier.
		model: String,
		/// Reason reported by the model.
		message: String,
	},

	/// A computed value produced another computation, which is not expanded again.
	#[error("Attribute [{attribute}] is still deferred after expansion")]
	UnresolvedAttribute {
		/// Attribute name.
		attribute: String,
	},

	/// A definition record failed validation.
	#[error("Validation error: {field}: {message}")]
	ValidationError {
		/// Field that failed validation.
		field: String,
		/// Validation error message.
		message: String,
	},

	/// Error parsing definition data.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// Definition file not found.
	#[error("Definition file not found: {0}")]
	FileNotFound(String),

	/// Unsupported file extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// Unknown faker kind or malformed generator spec.
	#[error("Faker error: {0}")]
	FakerError(String),

	/// Invalid configuration value.
	#[error("Configuration error: {0}")]
	Config(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),

	/// YAML serialization/deserialization error (when yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
