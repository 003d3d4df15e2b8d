use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A shared map whose entries expire a fixed amount of time after insertion.
///
/// Cloning yields another handle to the same entries. Expired entries are
/// purged when they are next looked up.
#[derive(Debug)]
pub struct TtlCache<K, V> {
	ttl: Duration,
	entries: Arc<Mutex<HashMap<K, (Instant, V)>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
	fn clone(&self) -> Self {
		Self {
			ttl: self.ttl,
			entries: self.entries.clone(),
		}
	}
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
	pub fn new(ttl: Duration) -> Self {
		Self {
			ttl,
			entries: Arc::new(Mutex::new(HashMap::new())),
		}
	}

	#[inline]
	pub fn get(&self, key: &K) -> Option<V> {
		self.get_at(key, Instant::now())
	}

	#[inline]
	pub fn insert(&self, key: K, value: V) {
		self.insert_at(key, value, Instant::now());
	}

	pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
		let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
		let (inserted_at, value) = entries.get(key)?;

		if now.saturating_duration_since(*inserted_at) < self.ttl {
			Some(value.clone())
		} else {
			entries.remove(key);
			None
		}
	}

	pub fn insert_at(&self, key: K, value: V, now: Instant) {
		self.entries
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(key, (now, value));
	}

	pub fn invalidate(&self, key: &K) {
		self.entries
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.remove(key);
	}

	pub fn clear(&self) {
		self.entries
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clear();
	}

	#[cfg(test)]
	fn is_empty(&self) -> bool {
		self.entries
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.is_empty()
	}
}

#[cfg(test)]
mod cache_tests {
	use super::*;

	#[test]
	fn entries_expire_after_ttl() {
		let cache = TtlCache::new(Duration::from_secs(60));
		let start = Instant::now();
		cache.insert_at("game", 3, start);

		assert_eq!(cache.get_at(&"game", start + Duration::from_secs(59)), Some(3));
		assert_eq!(cache.get_at(&"game", start + Duration::from_secs(60)), None);
		assert!(cache.is_empty(), "expired entries should be purged on lookup");
	}

	#[test]
	fn reinserting_refreshes_the_entry() {
		let cache = TtlCache::new(Duration::from_secs(10));
		let start = Instant::now();
		cache.insert_at(1, "old", start);
		cache.insert_at(1, "new", start + Duration::from_secs(8));

		assert_eq!(cache.get_at(&1, start + Duration::from_secs(15)), Some("new"));
	}

	#[test]
	fn clones_share_entries() {
		let cache = TtlCache::new(Duration::from_secs(10));
		let other = cache.clone();
		other.insert(7u32, 'x');

		assert_eq!(cache.get(&7), Some('x'));
		cache.invalidate(&7);
		assert_eq!(other.get(&7), None);
	}

	#[test]
	fn separate_caches_do_not_interfere() {
		let a = TtlCache::new(Duration::from_secs(10));
		let b: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(10));
		a.insert(1u32, 1u32);

		assert_eq!(b.get(&1), None);
		a.clear();
		assert!(a.is_empty());
	}
}
