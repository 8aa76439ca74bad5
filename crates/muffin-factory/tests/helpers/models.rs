//! In-memory models used by the integration tests.
//!
//! Saving assigns an id from a per-thread counter and appends to a
//! per-thread event log, so each test observes only its own events.

use std::cell::{Cell, RefCell};

use muffin_factory::{FactoryResult, Identifiable, Model, ResolvedAttributes, assign_with_serde};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

thread_local! {
	static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
	static NEXT_ID: Cell<i64> = const { Cell::new(1) };
}

/// Appends an entry to this thread's event log.
pub fn record(event: impl Into<String>) {
	EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

/// Drains this thread's event log.
pub fn take_events() -> Vec<String> {
	EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
}

fn next_id() -> i64 {
	NEXT_ID.with(|id| {
		let current = id.get();
		id.set(current + 1);
		current
	})
}

/// Error returned by a failing save.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// The record is locked and refuses to be saved.
	#[error("record '{0}' is locked")]
	Locked(String),
}

/// User account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub id: Option<i64>,
	pub name: String,
	pub email: String,
	pub age: i64,
	pub is_admin: bool,
	pub locked: bool,
}

impl Identifiable for User {
	fn primary_key(&self) -> Value {
		json!(self.id)
	}
}

impl Model for User {
	type Error = StoreError;

	fn model_id() -> &'static str {
		"auth.User"
	}

	fn assign_attributes(&mut self, attributes: &ResolvedAttributes) -> FactoryResult<()> {
		assign_with_serde(self, attributes)
	}

	fn save(&mut self, validate: bool) -> Result<(), Self::Error> {
		assert!(!validate, "factory must save without validation");
		if self.locked {
			return Err(StoreError::Locked(self.name.clone()));
		}
		self.id = Some(next_id());
		record(format!("save:{}", self.name));
		Ok(())
	}
}

/// Blog post owned by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
	pub id: Option<i64>,
	pub user_id: Option<i64>,
	pub title: String,
}

impl Identifiable for Post {
	fn primary_key(&self) -> Value {
		json!(self.id)
	}
}

impl Model for Post {
	type Error = StoreError;

	fn model_id() -> &'static str {
		"blog.Post"
	}

	fn assign_attributes(&mut self, attributes: &ResolvedAttributes) -> FactoryResult<()> {
		assign_with_serde(self, attributes)
	}

	fn save(&mut self, _validate: bool) -> Result<(), Self::Error> {
		self.id = Some(next_id());
		record(format!("save:{}", self.title));
		Ok(())
	}
}
