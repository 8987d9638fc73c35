//! In-memory store for short-lived interaction sessions.
//!
//! Every operation takes the map lock once and never awaits while holding it,
//! so a read-decide-write sequence expressed through [`SessionStore::modify`]
//! or [`SessionStore::remove_if`] cannot interleave with another event for the
//! same id.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};

/// Length of generated session ids.
pub const SESSION_ID_LEN: usize = 8;

/// A record addressed by id that stops being valid at a point in time.
pub trait SessionRecord {
    /// Routing id, unique among live records.
    fn id(&self) -> &str;

    /// Instant after which the record is dead.
    fn expires_at(&self) -> DateTime<Utc>;

    /// Whether the record is dead at `now`.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() <= now
    }
}

/// Decision returned from a [`SessionStore::modify`] closure.
#[derive(Debug)]
pub enum Entry<R> {
    /// Leave the (possibly mutated) record in place.
    Keep(R),
    /// Drop the record after the closure returns.
    Remove(R),
}

/// Result of [`SessionStore::remove_if`].
#[derive(Debug)]
pub enum Removal<T> {
    /// No record under that id.
    Missing,
    /// A record exists but the predicate declined it.
    Kept,
    /// The record was removed and ownership handed to the caller.
    Removed(T),
}

/// Map of live session records keyed by their generated id.
pub struct SessionStore<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T> Default for SessionStore<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: SessionRecord> SessionStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // No operation leaves the map half-updated, so poisoning is recovered.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone out the record stored under `id`.
    pub fn get(&self, id: &str) -> Option<T>
    where
        T: Clone,
    {
        self.lock().get(id).cloned()
    }

    /// Whether a record is stored under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Insert or replace a record by its id, returning the previous one.
    pub fn save(&self, record: T) -> Option<T> {
        self.lock().insert(record.id().to_owned(), record)
    }

    /// Build and insert a record under a freshly generated id that does not
    /// collide with any live record. Returns the id.
    pub fn insert_new(&self, build: impl FnOnce(String) -> T) -> String {
        let mut entries = self.lock();

        let id = loop {
            let candidate = generate_id();
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };

        entries.insert(id.clone(), build(id.clone()));
        id
    }

    /// Remove the record under `id`.
    pub fn delete(&self, id: &str) -> Option<T> {
        self.lock().remove(id)
    }

    /// Atomically inspect and mutate the record under `id`.
    ///
    /// Returns `None` when no record exists.
    pub fn modify<R>(&self, id: &str, f: impl FnOnce(&mut T) -> Entry<R>) -> Option<R> {
        let mut entries = self.lock();
        let record = entries.get_mut(id)?;

        match f(record) {
            Entry::Keep(result) => Some(result),
            Entry::Remove(result) => {
                entries.remove(id);
                Some(result)
            }
        }
    }

    /// Atomically remove the record under `id` when `take` accepts it.
    pub fn remove_if(&self, id: &str, take: impl FnOnce(&T) -> bool) -> Removal<T> {
        let mut entries = self.lock();

        match entries.get(id) {
            None => Removal::Missing,
            Some(record) if !take(record) => Removal::Kept,
            Some(_) => entries.remove(id).map_or(Removal::Missing, Removal::Removed),
        }
    }

    /// Remove every record that is expired at `now` and hand them back.
    ///
    /// A record returned here is no longer reachable through any other
    /// operation, so expiry side effects run at most once.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<T> {
        let mut entries = self.lock();

        let expired_ids: Vec<String> = entries
            .iter()
            .filter(|(_, record)| record.is_expired(now))
            .map(|(id, _)| id.clone())
            .collect();

        expired_ids
            .iter()
            .filter_map(|id| entries.remove(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
