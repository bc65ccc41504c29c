//! Per-movie like, dislike and view counters
//!
//! Records live in the durable store under `movie_stats_{id}`. Every
//! operation re-reads the record before writing it back, so two handles on
//! one store see each other's writes but may race (last write wins).

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use marquee_core::{DurableStore, Error, Result};
use marquee_storage::TypedStore;

const STATS_PREFIX: &str = "movie_stats_";

/// The viewer's single choice for a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    #[default]
    None,
    Liked,
    Disliked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub likes: u64,
    pub dislikes: u64,
    pub views: u64,
    #[serde(default)]
    pub reaction: Reaction,
}

impl EngagementRecord {
    /// Random counters so a first visit does not look empty
    pub fn seeded<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            likes: rng.random_range(50..550),
            dislikes: rng.random_range(0..50),
            views: rng.random_range(1000..11000),
            reaction: Reaction::None,
        }
    }

    /// none -> liked, liked -> none, disliked -> liked
    pub fn toggle_like(&mut self) {
        match self.reaction {
            Reaction::Liked => {
                self.likes = self.likes.saturating_sub(1);
                self.reaction = Reaction::None;
            }
            Reaction::Disliked => {
                self.likes += 1;
                self.dislikes = self.dislikes.saturating_sub(1);
                self.reaction = Reaction::Liked;
            }
            Reaction::None => {
                self.likes += 1;
                self.reaction = Reaction::Liked;
            }
        }
    }

    /// Mirror of [`EngagementRecord::toggle_like`]
    pub fn toggle_dislike(&mut self) {
        match self.reaction {
            Reaction::Disliked => {
                self.dislikes = self.dislikes.saturating_sub(1);
                self.reaction = Reaction::None;
            }
            Reaction::Liked => {
                self.dislikes += 1;
                self.likes = self.likes.saturating_sub(1);
                self.reaction = Reaction::Disliked;
            }
            Reaction::None => {
                self.dislikes += 1;
                self.reaction = Reaction::Disliked;
            }
        }
    }
}

/// Compact counter label: `999`, `1.2k`, `10.0k`
pub fn format_count(count: u64) -> String {
    if count >= 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}

fn stats_key(movie_id: &str) -> Result<String> {
    let movie_id = movie_id.trim();
    if movie_id.is_empty() {
        return Err(Error::Validation("movie id is required".to_string()));
    }
    Ok(format!("{STATS_PREFIX}{movie_id}"))
}

/// Persisted engagement counters
pub struct EngagementStore<S: DurableStore> {
    store: TypedStore<S>,
    rng: Arc<Mutex<StdRng>>,
}

impl<S: DurableStore> Clone for EngagementStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl<S: DurableStore> EngagementStore<S> {
    pub fn new(store: TypedStore<S>) -> Self {
        Self {
            store,
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    /// Deterministic seeding, for tests
    pub fn with_seed(store: TypedStore<S>, seed: u64) -> Self {
        Self {
            store,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn seed(&self) -> EngagementRecord {
        EngagementRecord::seeded(&mut *self.rng.lock())
    }

    /// Stored record, if any
    pub fn get(&self, movie_id: &str) -> Result<Option<EngagementRecord>> {
        self.store.load(&stats_key(movie_id)?)
    }

    /// Stored record, seeding and persisting one if absent
    pub fn load_or_seed(&self, movie_id: &str) -> Result<EngagementRecord> {
        let key = stats_key(movie_id)?;
        if let Some(record) = self.store.load(&key)? {
            return Ok(record);
        }
        let record = self.seed();
        self.store.save(&key, &record)?;
        tracing::debug!(target: "marquee", movie_id, "seeded engagement record");
        Ok(record)
    }

    pub fn toggle_like(&self, movie_id: &str) -> Result<EngagementRecord> {
        self.update(movie_id, EngagementRecord::toggle_like)
    }

    pub fn toggle_dislike(&self, movie_id: &str) -> Result<EngagementRecord> {
        self.update(movie_id, EngagementRecord::toggle_dislike)
    }

    fn update(&self, movie_id: &str, f: fn(&mut EngagementRecord)) -> Result<EngagementRecord> {
        let key = stats_key(movie_id)?;
        self.store.update(&key, || self.seed(), f)
    }

    /// Handle for one detail view of a movie
    pub fn mount(&self, movie_id: impl Into<String>) -> DetailMount<S> {
        DetailMount {
            store: self.clone(),
            movie_id: movie_id.into(),
            counted: AtomicBool::new(false),
        }
    }
}

/// One detail-page visit; counts at most one view
pub struct DetailMount<S: DurableStore> {
    store: EngagementStore<S>,
    movie_id: String,
    counted: AtomicBool,
}

impl<S: DurableStore> DetailMount<S> {
    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }

    /// Count this visit once
    ///
    /// An unknown movie is seeded instead; the seeded views include this
    /// visit. Later calls on the same mount only read.
    pub fn record_view(&self) -> Result<EngagementRecord> {
        if self.counted.swap(true, Ordering::AcqRel) {
            return self.store.load_or_seed(&self.movie_id);
        }

        let key = stats_key(&self.movie_id)?;
        let result = match self.store.store.load::<EngagementRecord>(&key)? {
            Some(mut record) => {
                record.views += 1;
                self.store.store.save(&key, &record).map(|_| record)
            }
            None => self.store.load_or_seed(&self.movie_id),
        };
        if result.is_err() {
            // Let a retry count the visit
            self.counted.store(false, Ordering::Release);
        }
        result
    }

    pub fn toggle_like(&self) -> Result<EngagementRecord> {
        self.store.toggle_like(&self.movie_id)
    }

    pub fn toggle_dislike(&self) -> Result<EngagementRecord> {
        self.store.toggle_dislike(&self.movie_id)
    }
}
