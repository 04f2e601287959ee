//! Shared HiLo value generator state
//!
//! Every HiLo column fed by the same sequence must draw from one block allocator, however
//! many threads insert rows. [`ValueGeneratorCache`] maps a sequence's qualified name to its
//! [`HiLoState`]; the first state stored for a name is the one every caller gets.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use pgschema_types::postgres::ddl::Sequence;

/// Hi/lo block allocator for one sequence
///
/// Each call to the fetch closure reserves `block_size` values starting at the returned
/// hi value; values are then handed out locally until the block runs dry.
#[derive(Debug)]
pub struct HiLoState {
    block_size: i64,
    block: Mutex<Block>,
}

#[derive(Debug, Default)]
struct Block {
    next: i64,
    end: i64,
}

impl HiLoState {
    /// A state whose blocks are `block_size` values wide (at least one)
    #[must_use]
    pub fn new(block_size: i64) -> Self {
        Self {
            block_size: block_size.max(1),
            block: Mutex::new(Block::default()),
        }
    }

    /// State for a sequence; the block size is its increment
    #[must_use]
    pub fn for_sequence(sequence: &Sequence) -> Self {
        Self::new(sequence.increment_by)
    }

    #[must_use]
    pub const fn block_size(&self) -> i64 {
        self.block_size
    }

    /// Next value, calling `fetch_hi` for a new block when the current one is used up.
    ///
    /// # Errors
    ///
    /// Returns the error of `fetch_hi`; the state is left as it was.
    pub fn next_value<E>(&self, fetch_hi: impl FnOnce() -> Result<i64, E>) -> Result<i64, E> {
        let mut block = self.block.lock();
        if block.next >= block.end {
            let hi = fetch_hi()?;
            block.next = hi;
            block.end = hi.saturating_add(self.block_size);
        }
        let value = block.next;
        block.next += 1;
        Ok(value)
    }
}

/// Concurrent map of sequence name to generator state
#[derive(Debug, Default)]
pub struct ValueGeneratorCache {
    states: DashMap<String, Arc<HiLoState>>,
}

impl ValueGeneratorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key of a sequence, `schema.name` or just `name`
    #[must_use]
    pub fn sequence_key(sequence: &Sequence) -> String {
        match &sequence.schema {
            Some(schema) => format!("{schema}.{}", sequence.name),
            None => sequence.name.to_string(),
        }
    }

    /// State for `sequence`, creating it on first use.
    ///
    /// Concurrent first calls for the same name all receive the state that was stored first.
    pub fn get_or_add_sequence_state(&self, sequence: &Sequence) -> Arc<HiLoState> {
        self.states
            .entry(Self::sequence_key(sequence))
            .or_insert_with(|| Arc::new(HiLoState::for_sequence(sequence)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn test_blocks_are_fetched_when_exhausted() {
        let state = HiLoState::new(3);
        let mut fetches = 0;
        let mut hi = 0;
        let mut values = Vec::new();

        for _ in 0..7 {
            let value = state
                .next_value(|| {
                    fetches += 1;
                    hi += 10;
                    Ok::<_, Infallible>(hi)
                })
                .unwrap();
            values.push(value);
        }

        assert_eq!(values, vec![10, 11, 12, 20, 21, 22, 30]);
        assert_eq!(fetches, 3);
    }

    #[test]
    fn test_fetch_error_leaves_state_untouched() {
        let state = HiLoState::new(2);
        assert_eq!(state.next_value(|| Err::<i64, _>("down")), Err("down"));
        assert_eq!(state.next_value(|| Ok::<_, &str>(100)), Ok(100));
        assert_eq!(state.next_value(|| Ok::<_, &str>(500)), Ok(101));
    }

    #[test]
    fn test_key_includes_schema() {
        let cache = ValueGeneratorCache::new();
        let public = Sequence::new("HiLoSequence");
        let app = Sequence::new("HiLoSequence").schema("app");

        assert_eq!(ValueGeneratorCache::sequence_key(&public), "HiLoSequence");
        assert_eq!(ValueGeneratorCache::sequence_key(&app), "app.HiLoSequence");

        let a = cache.get_or_add_sequence_state(&public);
        let b = cache.get_or_add_sequence_state(&app);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &cache.get_or_add_sequence_state(&public)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_first_writer_wins() {
        let cache = ValueGeneratorCache::new();
        let first = cache.get_or_add_sequence_state(&Sequence::new("seq").increment_by(10));
        let second = cache.get_or_add_sequence_state(&Sequence::new("seq").increment_by(50));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.block_size(), 10);
    }

    #[test]
    fn test_concurrent_callers_share_one_state() {
        let cache = ValueGeneratorCache::new();
        let sequence = Sequence::new("HiLoSequence").increment_by(10);
        let hi = AtomicI64::new(0);

        let values: Vec<i64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        let state = cache.get_or_add_sequence_state(&sequence);
                        (0..25)
                            .map(|_| {
                                state
                                    .next_value(|| {
                                        Ok::<_, Infallible>(hi.fetch_add(10, Ordering::SeqCst))
                                    })
                                    .unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let mut sorted = values.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 200);
        assert_eq!(sorted, (0..200).collect::<Vec<_>>());
        assert_eq!(cache.len(), 1);
    }
}
