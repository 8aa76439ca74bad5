//! Random data generator shared by every blueprint, state and hook.
//!
//! The factory never interprets the generator; it only hands the same
//! instance to every callback. Internally it wraps a seedable
//! [`StdRng`](rand::rngs::StdRng) and the named sequence counters used for
//! unique values such as `user_1`, `user_2`.

use std::collections::HashMap;

use fake::Dummy;
use parking_lot::Mutex;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shared source of fake values.
///
/// Every method takes `&self`; the RNG lock is held only for a single draw,
/// so callbacks are free to call back into the factory while generating.
pub struct Generator {
	rng: Mutex<StdRng>,
	sequences: Mutex<HashMap<String, u64>>,
	seed: Mutex<Option<u64>>,
}

impl Generator {
	/// Creates a generator seeded from system entropy.
	pub fn new() -> Self {
		Self {
			rng: Mutex::new(StdRng::from_entropy()),
			sequences: Mutex::new(HashMap::new()),
			seed: Mutex::new(None),
		}
	}

	/// Creates a generator with a fixed seed, producing reproducible data.
	pub fn seeded(seed: u64) -> Self {
		Self {
			rng: Mutex::new(StdRng::seed_from_u64(seed)),
			sequences: Mutex::new(HashMap::new()),
			seed: Mutex::new(Some(seed)),
		}
	}

	/// Returns the seed, if the generator was seeded explicitly.
	pub fn seed(&self) -> Option<u64> {
		*self.seed.lock()
	}

	/// Restarts the random stream from `seed`.
	///
	/// Sequence counters are left untouched.
	pub fn reseed(&self, seed: u64) {
		*self.rng.lock() = StdRng::seed_from_u64(seed);
		*self.seed.lock() = Some(seed);
	}

	/// Generates a value using a `fake` faker.
	///
	/// # Example
	///
	/// ```
	/// use fake::faker::internet::en::SafeEmail;
	/// use muffin_factory::Generator;
	///
	/// let generator = Generator::seeded(7);
	/// let email: String = generator.fake(SafeEmail());
	/// assert!(email.contains('@'));
	/// ```
	pub fn fake<T, F>(&self, faker: F) -> T
	where
		T: Dummy<F>,
	{
		let mut rng = self.rng.lock();
		T::dummy_with_rng(&faker, &mut *rng)
	}

	/// Generates a number uniformly distributed in `range`.
	///
	/// # Panics
	///
	/// Panics if the range is empty.
	pub fn between<T, R>(&self, range: R) -> T
	where
		T: SampleUniform,
		R: SampleRange<T>,
	{
		self.rng.lock().gen_range(range)
	}

	/// Returns `true` with the given probability (clamped to `0.0..=1.0`).
	///
	/// A NaN probability never succeeds.
	pub fn chance(&self, probability: f64) -> bool {
		if probability.is_nan() {
			return false;
		}
		self.rng.lock().gen_bool(probability.clamp(0.0, 1.0))
	}

	/// Picks a random element, or `None` for an empty slice.
	pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
		items.choose(&mut *self.rng.lock())
	}

	/// Runs `f` with exclusive access to the underlying RNG.
	///
	/// The closure must not call back into this generator.
	pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
		f(&mut self.rng.lock())
	}

	/// Returns the next value of the named sequence, starting at 1.
	pub fn sequence(&self, key: &str) -> u64 {
		let mut sequences = self.sequences.lock();
		let counter = sequences.entry(key.to_string()).or_insert(0);
		*counter += 1;
		*counter
	}

	/// Advances the named sequence and substitutes it for `{n}` in `template`.
	///
	/// ```
	/// use muffin_factory::Generator;
	///
	/// let generator = Generator::new();
	/// assert_eq!(generator.sequence_format("code", "user_{n}"), "user_1");
	/// assert_eq!(generator.sequence_format("code", "user_{n}"), "user_2");
	/// ```
	pub fn sequence_format(&self, key: &str, template: &str) -> String {
		let n = self.sequence(key);
		template.replace("{n}", &n.to_string())
	}

	/// Resets every sequence counter.
	pub fn reset_sequences(&self) {
		self.sequences.lock().clear();
	}
}

impl Default for Generator {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Generator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Generator")
			.field("seed", &self.seed())
			.field("sequences", &self.sequences.lock().len())
			.finish()
	}
}
