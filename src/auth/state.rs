use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::sync::Mutex;

/// Anti-forgery `state` token source.
///
/// Seeded once per process from the OS entropy source, then drawn from a
/// deterministic PRNG. The tokens only need to be hard to guess for the
/// lifetime of a login round trip; they are never used as key material.
///
/// The underlying generator is stateful and not safe for concurrent use, so
/// every draw happens under the mutex and the lock is held only for the draw.
#[derive(Debug)]
pub struct StateGenerator {
    rng: Mutex<StdRng>,
}

impl Default for StateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGenerator {
    #[must_use]
    pub fn new() -> Self {
        let seed = rand::rngs::OsRng.next_u64();
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw the next anti-forgery token.
    #[must_use]
    pub fn next_state(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        rng.gen::<u64>().to_string()
    }
}
