use std::collections::BTreeSet;
use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::AllocError;

/// Number of usable ids: `1..=65535`.
pub const ANIMATION_ID_SPACE: usize = u16::MAX as usize;

/// Random probes before falling back to a linear scan for a free id.
const RANDOM_PROBES: usize = 64;

/// Animation group id correlating an item group with its runtime track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(u16);

impl AnimationId {
    /// `None` for 0, which is never allocated.
    pub fn new(raw: u16) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AnimationIdAllocator
// ---------------------------------------------------------------------------

/// Session-scoped registry of animation ids.
///
/// Ids are drawn at random so that stages authored in separate sessions rarely
/// collide, and are only ever handed out once until released.
pub struct AnimationIdAllocator {
    used: BTreeSet<u16>,
    rng: StdRng,
}

impl Default for AnimationIdAllocator {
    fn default() -> Self {
        Self {
            used: BTreeSet::new(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl AnimationIdAllocator {
    /// Deterministic allocator, for tests and reproducible tooling.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            used: BTreeSet::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn allocate(&mut self) -> Result<AnimationId, AllocError> {
        if self.used.len() >= ANIMATION_ID_SPACE {
            tracing::warn!("animation id space exhausted");
            return Err(AllocError::ResourceExhausted(ANIMATION_ID_SPACE));
        }

        for _ in 0..RANDOM_PROBES {
            let candidate = self.rng.gen_range(1..=u16::MAX);
            if self.used.insert(candidate) {
                tracing::debug!("allocated animation id {candidate}");
                return Ok(AnimationId(candidate));
            }
        }

        // Dense registry: walk forward from a random point to the next free id.
        let offset = self.rng.gen_range(0..ANIMATION_ID_SPACE);
        let candidate = (0..ANIMATION_ID_SPACE)
            .map(|i| ((offset + i) % ANIMATION_ID_SPACE) as u16 + 1)
            .find(|id| !self.used.contains(id))
            .ok_or(AllocError::ResourceExhausted(ANIMATION_ID_SPACE))?;
        self.used.insert(candidate);
        tracing::debug!("allocated animation id {candidate} after scan");
        Ok(AnimationId(candidate))
    }

    /// Register an id that already exists, e.g. on an object loaded from disk.
    /// Returns `false` if it was already registered.
    pub fn reserve(&mut self, id: AnimationId) -> bool {
        self.used.insert(id.0)
    }

    /// Returns `false` if the id was not registered.
    pub fn release(&mut self, id: AnimationId) -> bool {
        self.used.remove(&id.0)
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.used.contains(&id.0)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
