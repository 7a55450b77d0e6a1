//! Multi-value hash map, keyed by string, open-chained by bucket.
//!
//! Every value is a [`List`] rather than a single slot: `put` always
//! appends, `get`/`remove` always return the whole bucket's list.
//! Capacity is rounded up to a power of two at creation and never
//! rehashed — the 0.75 load factor is reported via [`Map::load_factor`]
//! but nothing enforces it; it is a soft target, not a trigger.

use crate::List;

fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

fn next_power_of_two(value: u32) -> u32 {
    if value <= 1 {
        1
    } else {
        1u32 << (32 - (value - 1).leading_zeros())
    }
}

struct Entry<V> {
    key: String,
    values: List<V>,
}

/// A multi-value hash map keyed by string.
pub struct Map<V> {
    buckets: Vec<Vec<Entry<V>>>,
    capacity: u32,
    len: usize,
    mod_count: u64,
}

impl<V> Map<V> {
    /// Creates a map whose effective capacity is the next power of two
    /// `>= max(16, requested_cap)`.
    pub fn create(requested_cap: u32) -> Self {
        let capacity = next_power_of_two(requested_cap.max(16));
        Map {
            buckets: (0..capacity).map(|_| Vec::new()).collect(),
            capacity,
            len: 0,
            mod_count: 0,
        }
    }

    /// The number of destructive operations performed so far, for
    /// fail-fast iteration.
    pub fn mod_count(&self) -> u64 {
        self.mod_count
    }

    fn bucket_index(&self, key: &str) -> usize {
        (fnv1a(key.as_bytes()) % self.capacity) as usize
    }

    /// The soft load-factor target (0.75); not enforced.
    pub fn load_factor(&self) -> f32 {
        0.75
    }

    /// Effective bucket capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of distinct keys currently stored.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        let index = self.bucket_index(key);
        self.buckets[index].iter().any(|e| e.key == key)
    }

    /// Appends `value` to the list stored under `key`, creating an
    /// empty list first if `key` is new.
    pub fn put(&mut self, key: &str, value: V) {
        self.get_or_create(key).push_back(value);
    }

    /// Borrows the list stored under `key`, or `None` if absent.
    pub fn get(&self, key: &str) -> Option<&List<V>> {
        let index = self.bucket_index(key);
        self.buckets[index].iter().find(|e| e.key == key).map(|e| &e.values)
    }

    /// Mutably borrows the list stored under `key`, creating an empty
    /// one first if `key` is new.
    pub fn get_or_create(&mut self, key: &str) -> &mut List<V> {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        if let Some(pos) = bucket.iter().position(|e| e.key == key) {
            return &mut bucket[pos].values;
        }
        bucket.push(Entry {
            key: key.to_string(),
            values: List::create(),
        });
        self.len += 1;
        self.mod_count += 1;
        &mut bucket.last_mut().expect("just pushed").values
    }

    /// Removes and returns the list stored under `key`, or `None` if
    /// absent.
    pub fn remove(&mut self, key: &str) -> Option<List<V>> {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        let pos = bucket.iter().position(|e| e.key == key)?;
        self.len -= 1;
        self.mod_count += 1;
        Some(bucket.remove(pos).values)
    }

    /// Empties the map.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
        self.mod_count += 1;
    }

    /// Every key currently stored, in bucket/insertion order (not
    /// insertion-time order across buckets).
    pub fn keys(&self) -> Vec<String> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|e| e.key.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(Map::<u32>::create(10).capacity(), 16);
        assert_eq!(Map::<u32>::create(17).capacity(), 32);
        assert_eq!(Map::<u32>::create(0).capacity(), 16);
    }

    #[test]
    fn put_appends_to_a_multi_value_bucket() {
        let mut map = Map::create(16);
        map.put("a", 1);
        map.put("a", 2);
        assert_eq!(map.get("a").unwrap().snapshot(), vec![1, 2]);
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn get_or_create_never_returns_a_missing_list() {
        let mut map: Map<u32> = Map::create(16);
        assert!(map.get_or_create("fresh").is_empty());
        assert!(map.contains("fresh"));
    }

    #[test]
    fn remove_transfers_ownership_of_the_list() {
        let mut map = Map::create(16);
        map.put("k", 1);
        let list = map.remove("k").unwrap();
        assert_eq!(list.snapshot(), vec![1]);
        assert!(!map.contains("k"));
    }

    #[test]
    fn keys_lists_every_distinct_key() {
        let mut map: Map<u32> = Map::create(16);
        map.put("x", 1);
        map.put("y", 2);
        let mut keys = map.keys();
        keys.sort();
        assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);
    }
}
