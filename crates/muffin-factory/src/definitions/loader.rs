//! Directory scanning and registration of definition files.

use std::path::Path;

use tracing::{debug, info, warn};

use super::{DefinitionFormat, DefinitionParser, DefinitionRecord, DefinitionTemplate};
use crate::blueprint::State;
use crate::error::FactoryResult;
use crate::registry::Factory;

/// Loads every definition file below a directory into a [`Factory`].
#[derive(Debug, Clone, Default)]
pub struct DefinitionLoader {
	max_depth: Option<usize>,
}

impl DefinitionLoader {
	/// Creates a loader that scans without a depth limit.
	pub fn new() -> Self {
		Self::default()
	}

	/// Limits the scan depth below the root directory (`1` = root only).
	pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// Registers the blueprints and states declared under `path`.
	///
	/// Files are visited in name order. Files with an unknown extension, or
	/// a format this build cannot parse, are skipped. A `path` that is not a
	/// directory registers nothing.
	///
	/// Returns the number of blueprints and states registered.
	///
	/// # Errors
	///
	/// Fails on the first file that cannot be read, parsed or compiled.
	/// Records from files visited earlier stay registered.
	pub fn load(&self, factory: &Factory, path: &Path) -> FactoryResult<usize> {
		if !path.is_dir() {
			debug!(path = %path.display(), "Definitions path is not a directory; skipping");
			return Ok(0);
		}

		let parser = DefinitionParser::new();
		let mut walker = walkdir::WalkDir::new(path)
			.min_depth(1)
			.sort_by_file_name();
		if let Some(depth) = self.max_depth {
			walker = walker.max_depth(depth);
		}

		let mut files = 0;
		let mut registered = 0;
		for entry in walker {
			let entry = entry.map_err(std::io::Error::from)?;
			if !entry.file_type().is_file() {
				continue;
			}
			let file_path = entry.path();

			match DefinitionFormat::from_path(file_path) {
				Some(format) if format.is_enabled() => {}
				Some(format) => {
					warn!(path = %file_path.display(), %format, "Definition format not enabled; skipping");
					continue;
				}
				None => {
					warn!(path = %file_path.display(), "Unrecognized definition file; skipping");
					continue;
				}
			}

			let file = parser.parse_file(file_path)?;
			registered += self.register_records(factory, &file.records)?;
			files += 1;
		}

		info!(
			path = %path.display(),
			"Loaded {} definitions from {} files",
			registered,
			files
		);
		Ok(registered)
	}

	/// Registers already-parsed records; returns how many were registered.
	///
	/// Every record is compiled before the first one is registered, so a
	/// failing record leaves the factory untouched.
	pub fn register_records(
		&self,
		factory: &Factory,
		records: &[DefinitionRecord],
	) -> FactoryResult<usize> {
		let compiled = records
			.iter()
			.map(|record| -> FactoryResult<_> {
				Ok((record, DefinitionTemplate::compile(&record.model, &record.attributes)?))
			})
			.collect::<FactoryResult<Vec<_>>>()?;

		for (record, template) in compiled {
			match &record.state {
				Some(state) => {
					let state_def = if template.is_static() {
						State::Static(template.generate(factory.generator()))
					} else {
						State::computed(move |generator, _| template.generate(generator))
					};
					factory.state_for(&record.model, state, state_def);
				}
				None => {
					factory.define_for(&record.model, record.blueprint_name(), move |generator, _| {
						template.generate(generator)
					});
				}
			}
		}

		Ok(records.len())
	}
}
