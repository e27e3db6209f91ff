//! In-memory store implementation.
//!
//! Mirrors the Redis data model closely enough for behavioural tests: typed keys
//! (a key used with the wrong structure fails with `WRONGTYPE`), empty collections
//! disappear, ties in a sorted set are broken by descending member, and scans walk
//! the key space with an opaque cursor.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::StoreError;
use crate::interfaces::KeyValueStore;
use crate::memory::glob;
use crate::types::{AtomicBatch, BatchOpResult, BatchSummary, StoreOp};

const WRONGTYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Debug, Clone)]
enum Entry {
    Hash(HashMap<String, String>),
    SortedSet(HashMap<String, f64>),
    Set(HashSet<String>),
}

impl Entry {
    fn is_empty(&self) -> bool {
        match self {
            Entry::Hash(h) => h.is_empty(),
            Entry::SortedSet(z) => z.is_empty(),
            Entry::Set(s) => s.is_empty(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<String, Entry>,
    unavailable: bool,
    failing_keys: HashSet<String>,
    /// Open scan cursors, each mapped to the last key it returned.
    cursors: HashMap<u64, String>,
    next_cursor: u64,
}

impl State {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::connection("Connection refused (store unavailable)"));
        }
        Ok(())
    }

    fn hash(&self, key: &str) -> Result<Option<&HashMap<String, String>>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::Hash(h)) => Ok(Some(h)),
            Some(_) => Err(StoreError::command(WRONGTYPE)),
        }
    }

    fn sorted_set(&self, key: &str) -> Result<Option<&HashMap<String, f64>>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::SortedSet(z)) => Ok(Some(z)),
            Some(_) => Err(StoreError::command(WRONGTYPE)),
        }
    }

    fn set(&self, key: &str) -> Result<Option<&HashSet<String>>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::Set(s)) => Ok(Some(s)),
            Some(_) => Err(StoreError::command(WRONGTYPE)),
        }
    }

    fn hash_mut(&mut self, key: &str) -> Result<&mut HashMap<String, String>, StoreError> {
        match self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(h) => Ok(h),
            _ => Err(StoreError::command(WRONGTYPE)),
        }
    }

    fn sorted_set_mut(&mut self, key: &str) -> Result<&mut HashMap<String, f64>, StoreError> {
        match self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::SortedSet(HashMap::new()))
        {
            Entry::SortedSet(z) => Ok(z),
            _ => Err(StoreError::command(WRONGTYPE)),
        }
    }

    fn set_mut(&mut self, key: &str) -> Result<&mut HashSet<String>, StoreError> {
        match self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(HashSet::new()))
        {
            Entry::Set(s) => Ok(s),
            _ => Err(StoreError::command(WRONGTYPE)),
        }
    }

    /// Drop `key` if its collection became empty.
    fn prune(&mut self, key: &str) {
        if self.entries.get(key).is_some_and(Entry::is_empty) {
            self.entries.remove(key);
        }
    }

    fn hash_set(&mut self, key: &str, field: &str, value: &str) -> Result<i64, StoreError> {
        let hash = self.hash_mut(key)?;
        let created = hash.insert(field.to_string(), value.to_string()).is_none();
        Ok(created as i64)
    }

    fn sorted_set_add(&mut self, key: &str, member: &str, score: f64) -> Result<i64, StoreError> {
        let zset = self.sorted_set_mut(key)?;
        let created = zset.insert(member.to_string(), score).is_none();
        Ok(created as i64)
    }

    fn sorted_set_increment(
        &mut self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, StoreError> {
        let zset = self.sorted_set_mut(key)?;
        let score = zset.entry(member.to_string()).or_insert(0.0);
        *score += delta;
        Ok(*score)
    }

    fn set_add(&mut self, key: &str, member: &str) -> Result<bool, StoreError> {
        let set = self.set_mut(key)?;
        Ok(set.insert(member.to_string()))
    }

    fn set_remove(&mut self, key: &str, member: &str) -> Result<bool, StoreError> {
        let removed = match self.entries.get_mut(key) {
            None => false,
            Some(Entry::Set(s)) => s.remove(member),
            Some(_) => return Err(StoreError::command(WRONGTYPE)),
        };
        self.prune(key);
        Ok(removed)
    }

    fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// One scan step. The cursor resumes after the last key it returned, so keys
    /// removed in between do not shift the walk.
    fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> (u64, Vec<String>) {
        let lower = match cursor {
            0 => Bound::Unbounded,
            id => match self.cursors.remove(&id) {
                Some(last) => Bound::Excluded(last),
                None => return (0, vec![]),
            },
        };

        let count = count.max(1);
        let mut window: Vec<&String> = self
            .entries
            .range::<String, _>((lower, Bound::Unbounded))
            .map(|(key, _)| key)
            .take(count + 1)
            .collect();

        let has_more = window.len() > count;
        window.truncate(count);
        let keys: Vec<String> = window
            .iter()
            .filter(|key| glob::matches(pattern, key))
            .map(|key| key.to_string())
            .collect();

        let next = match window.last() {
            Some(last) if has_more => {
                let last = last.to_string();
                self.next_cursor += 1;
                self.cursors.insert(self.next_cursor, last);
                self.next_cursor
            }
            _ => 0,
        };
        (next, keys)
    }

    /// Apply one batch operation, honouring injected failures.
    fn apply(&mut self, op: &StoreOp) -> Result<Option<i64>, StoreError> {
        if self.failing_keys.contains(op.key()) {
            return Err(StoreError::command(format!("injected failure on {}", op.key())));
        }

        let reply = match op {
            StoreOp::HashSet { key, field, value } => self.hash_set(key, field, value)?,
            StoreOp::SortedSetAdd { key, member, score } => {
                self.sorted_set_add(key, member, *score)?
            }
            StoreOp::SortedSetIncrement { key, member, delta } => {
                self.sorted_set_increment(key, member, *delta)? as i64
            }
            StoreOp::SetAdd { key, member } => self.set_add(key, member)? as i64,
            StoreOp::SetRemove { key, member } => self.set_remove(key, member)? as i64,
            StoreOp::Delete { key } => self.delete(key) as i64,
        };
        Ok(Some(reply))
    }
}

/// Process-local `KeyValueStore`.
///
/// All state sits behind one async mutex, so every primitive and every atomic
/// batch is applied under a single lock acquisition. Like Redis `EXEC`, a batch
/// operation that fails does not roll back the others; its failure is reported in
/// the returned `BatchSummary`.
///
/// Failure injection helpers let tests simulate an unreachable store or a failing
/// write inside a batch.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a connection error (or stop doing so).
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    /// Make every batch operation that writes to `key` fail.
    pub async fn fail_batch_writes_to(&self, key: impl Into<String>) {
        self.state.lock().await.failing_keys.insert(key.into());
    }

    /// Remove every injected failure.
    pub async fn clear_faults(&self) {
        let mut state = self.state.lock().await;
        state.unavailable = false;
        state.failing_keys.clear();
    }

    /// Members of a set, sorted. Empty when the key is absent.
    pub async fn set_members(&self, key: &str) -> Vec<String> {
        let state = self.state.lock().await;
        let mut members: Vec<String> = match state.entries.get(key) {
            Some(Entry::Set(s)) => s.iter().cloned().collect(),
            _ => vec![],
        };
        members.sort();
        members
    }

    /// Whether `key` currently exists.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.state.lock().await.entries.contains_key(key)
    }

    /// Number of keys currently stored.
    pub async fn key_count(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.state.lock().await.check_available()
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.hash(key)?.and_then(|h| h.get(field).cloned()))
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.hash_set(key, field, value)?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.hash(key)?.cloned().unwrap_or_default())
    }

    async fn hash_delete(&self, key: &str, field: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        let removed = match state.entries.get_mut(key) {
            None => false,
            Some(Entry::Hash(h)) => h.remove(field).is_some(),
            Some(_) => return Err(StoreError::command(WRONGTYPE)),
        };
        state.prune(key);
        Ok(removed as u64)
    }

    async fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.hash(key)?.is_some_and(|h| h.contains_key(field)))
    }

    async fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.hash(key)?.map_or(0, |h| h.len() as u64))
    }

    async fn sorted_set_increment(
        &self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.sorted_set_increment(key, member, delta)
    }

    async fn sorted_set_score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.sorted_set(key)?.and_then(|z| z.get(member).copied()))
    }

    async fn sorted_set_range_desc_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        let mut entries: Vec<(String, f64)> = state
            .sorted_set(key)?
            .map(|z| z.iter().map(|(m, s)| (m.clone(), *s)).collect())
            .unwrap_or_default();
        // Same order as ZREVRANGE: score desc, then member desc.
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        Ok(entries)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.set_add(key, member)
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.set_remove(key, member)
    }

    async fn execute_atomic(&self, batch: &AtomicBatch) -> Result<BatchSummary, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let results = batch
            .ops()
            .iter()
            .map(|op| match state.apply(op) {
                Ok(reply) => BatchOpResult::ok(op, reply),
                Err(e) => BatchOpResult::failed(op, e),
            })
            .collect();

        let summary = BatchSummary::from_results(results);
        debug!(
            total = summary.total,
            failed = summary.failed,
            "Applied in-memory batch"
        );
        Ok(summary)
    }

    async fn scan_keys(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        Ok(state.scan(cursor, pattern, count))
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        Ok(keys.iter().filter(|key| state.delete(key)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wrong_type_is_rejected() {
        let store = InMemoryStore::new();
        store.set_add("k", "m").await.unwrap();

        let result = store.hash_set("k", "f", "v").await;

        assert!(matches!(result, Err(StoreError::CommandError(_))));
    }

    #[tokio::test]
    async fn test_empty_set_disappears() {
        let store = InMemoryStore::new();
        store.set_add("k", "m").await.unwrap();
        assert!(store.set_remove("k", "m").await.unwrap());

        assert!(!store.contains_key("k").await);
        assert!(!store.set_remove("k", "m").await.unwrap());
    }

    #[tokio::test]
    async fn test_range_breaks_ties_by_descending_member() {
        let store = InMemoryStore::new();
        store.sorted_set_increment("z", "a", 1.0).await.unwrap();
        store.sorted_set_increment("z", "c", 1.0).await.unwrap();
        store.sorted_set_increment("z", "b", 2.0).await.unwrap();

        let range = store.sorted_set_range_desc_with_scores("z").await.unwrap();

        assert_eq!(
            range,
            vec![
                ("b".to_string(), 2.0),
                ("c".to_string(), 1.0),
                ("a".to_string(), 1.0)
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_reports_failure_without_rollback() {
        let store = InMemoryStore::new();
        store.fail_batch_writes_to("bad").await;

        let mut batch = AtomicBatch::new();
        batch.set_add("good", "u1").set_add("bad", "u1");
        let summary = store.execute_atomic(&batch).await.unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(store.set_members("good").await, vec!["u1"]);
        assert!(!store.contains_key("bad").await);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_everything() {
        let store = InMemoryStore::new();
        store.set_unavailable(true).await;

        assert!(matches!(store.ping().await, Err(StoreError::ConnectionError(_))));
        assert!(store.execute_atomic(&AtomicBatch::new()).await.is_err());

        store.clear_faults().await;
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_scan_walks_every_key() {
        let store = InMemoryStore::new();
        for i in 0..7 {
            store.set_add(&format!("p:{}", i), "u").await.unwrap();
        }
        store.hash_set("other", "f", "v").await.unwrap();

        let mut cursor = 0;
        let mut found = Vec::new();
        loop {
            let (next, keys) = store.scan_keys(cursor, "p:*", 3).await.unwrap();
            found.extend(keys);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        found.sort();
        assert_eq!(found.len(), 7);
        assert_eq!(found[0], "p:0");
        assert!(!found.contains(&"other".to_string()));
    }

    #[tokio::test]
    async fn test_scan_survives_removal_of_returned_key() {
        let store = InMemoryStore::new();
        for key in ["p:a", "p:b", "p:c", "p:d"] {
            store.set_add(key, "u").await.unwrap();
        }

        let (cursor, mut found) = store.scan_keys(0, "p:*", 2).await.unwrap();
        assert_eq!(found, vec!["p:a", "p:b"]);
        assert_ne!(cursor, 0);

        store.set_remove("p:a", "u").await.unwrap();

        let mut cursor = cursor;
        while cursor != 0 {
            let (next, keys) = store.scan_keys(cursor, "p:*", 2).await.unwrap();
            found.extend(keys);
            cursor = next;
        }

        assert_eq!(found, vec!["p:a", "p:b", "p:c", "p:d"]);
    }

    #[tokio::test]
    async fn test_scan_ends_on_last_page() {
        let store = InMemoryStore::new();
        store.set_add("p:a", "u").await.unwrap();
        store.set_add("p:b", "u").await.unwrap();

        assert_eq!(
            store.scan_keys(0, "p:*", 2).await.unwrap(),
            (0, vec!["p:a".to_string(), "p:b".to_string()])
        );
        assert_eq!(store.scan_keys(42, "p:*", 2).await.unwrap(), (0, vec![]));
    }
}
