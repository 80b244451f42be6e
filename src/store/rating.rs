//! Rating aggregates: a running (count, sum) per device.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::StoreError;

/// Running aggregate of the scores given to one device.
///
/// `count` only ever grows; the average is derived on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rating {
    pub count: u32,
    pub sum: f64,
}

impl Rating {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Abstract storage for rating aggregates.
pub trait RatingStore: Send + Sync {
    /// Fold `score` into the aggregate for `device_id` (creating it with
    /// count 1 on the first score) and return the updated aggregate.
    fn add(&self, device_id: &str, score: f64) -> Result<Rating, StoreError>;

    /// Current aggregate for `device_id`, if it was ever rated.
    fn get(&self, device_id: &str) -> Result<Option<Rating>, StoreError>;
}

/// In-memory rating store. Clones share the same aggregates.
#[derive(Clone, Default)]
pub struct InMemoryRatingStore {
    ratings: Arc<RwLock<HashMap<String, Rating>>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn add(&self, device_id: &str, score: f64) -> Result<Rating, StoreError> {
        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| StoreError::LockPoisoned("rating add"))?;

        let rating = ratings.entry(device_id.to_string()).or_default();
        rating.count = rating
            .count
            .checked_add(1)
            .ok_or_else(|| StoreError::Overflow(device_id.to_string()))?;
        rating.sum += score;
        Ok(*rating)
    }

    fn get(&self, device_id: &str) -> Result<Option<Rating>, StoreError> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| StoreError::LockPoisoned("rating get"))?;
        Ok(ratings.get(device_id).copied())
    }
}
