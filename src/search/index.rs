// ============================================================================
// Substring Hash Index
// n-gram hashes of a text, keyed by (length, hash), with literal verification
// ============================================================================

use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Multiplier of the polynomial rolling hash
pub const HASH_BASE: u64 = 31;

/// Start offsets sharing one (length, hash) key, in insertion order.
/// Most keys over digit text hold a handful of positions.
pub type Positions = SmallVec<[usize; 4]>;

/// Polynomial hash `sum(b[i] * 31^(len-1-i))`, wrapping at 2^64.
pub fn polynomial_hash(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |hash, &byte| {
        hash.wrapping_mul(HASH_BASE).wrapping_add(u64::from(byte))
    })
}

/// Storage for n-gram hashes.
///
/// All methods take `&self`; implementations synchronize internally so one
/// repository can back searches from several threads.
pub trait IndexRepository: Send + Sync {
    /// Record that the window of `length` bytes at `position` hashes to `hash`
    fn add_hash(&self, hash: u64, length: usize, position: usize);

    /// Flag `length` as fully indexed
    fn mark_indexed(&self, length: usize);

    fn is_length_indexed(&self, length: usize) -> bool;

    /// Candidate positions for `hash` at `length`, ascending when the
    /// length was indexed in one pass. Candidates are not verified.
    fn match_positions(&self, hash: u64, length: usize) -> Positions;

    /// Drop every hash stored for `length`, returning how many positions
    /// were removed. The length is no longer considered indexed.
    fn clear_hashes(&self, length: usize) -> usize;
}

#[derive(Debug, Default)]
struct IndexTables {
    hashes: HashMap<(usize, u64), Positions>,
    lengths: HashSet<usize>,
}

/// Process-local repository behind a `parking_lot::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryIndexRepository {
    tables: RwLock<IndexTables>,
}

impl InMemoryIndexRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct (length, hash) keys
    pub fn key_count(&self) -> usize {
        self.tables.read().hashes.len()
    }
}

impl IndexRepository for InMemoryIndexRepository {
    fn add_hash(&self, hash: u64, length: usize, position: usize) {
        self.tables
            .write()
            .hashes
            .entry((length, hash))
            .or_default()
            .push(position);
    }

    fn mark_indexed(&self, length: usize) {
        self.tables.write().lengths.insert(length);
    }

    fn is_length_indexed(&self, length: usize) -> bool {
        self.tables.read().lengths.contains(&length)
    }

    fn match_positions(&self, hash: u64, length: usize) -> Positions {
        self.tables
            .read()
            .hashes
            .get(&(length, hash))
            .cloned()
            .unwrap_or_default()
    }

    fn clear_hashes(&self, length: usize) -> usize {
        let mut tables = self.tables.write();
        let mut removed = 0;
        tables.hashes.retain(|(key_length, _), positions| {
            if *key_length == length {
                removed += positions.len();
                false
            } else {
                true
            }
        });
        tables.lengths.remove(&length);
        removed
    }
}

/// Finds substrings of a fixed text through a hash index.
///
/// Each query length is indexed on first use with a rolling hash over every
/// window of the text. Hash hits are compared against the text before they
/// are reported, so collisions never produce false matches.
///
/// Positions are byte offsets, like `str::find`.
pub struct HashSearcher<R: IndexRepository = InMemoryIndexRepository> {
    text: String,
    repository: R,
    /// Held while a length is being indexed so each length is built once
    indexing: Mutex<()>,
}

impl HashSearcher<InMemoryIndexRepository> {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_repository(text, InMemoryIndexRepository::new())
    }
}

impl<R: IndexRepository> HashSearcher<R> {
    pub fn with_repository(text: impl Into<String>, repository: R) -> Self {
        Self {
            text: text.into(),
            repository,
            indexing: Mutex::new(()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Hash every window of `length` bytes and mark the length indexed.
    ///
    /// Returns the number of windows added. Already indexed lengths are
    /// skipped, including ones another thread finished while this call
    /// waited for the indexing lock.
    pub fn index_length(&self, length: usize) -> usize {
        if length == 0 || self.repository.is_length_indexed(length) {
            return 0;
        }

        let _indexing = self.indexing.lock();
        if self.repository.is_length_indexed(length) {
            return 0;
        }

        let bytes = self.text.as_bytes();
        if length > bytes.len() {
            self.repository.mark_indexed(length);
            return 0;
        }

        // Weight of the byte leaving the window
        let leading = (1..length).fold(1u64, |weight, _| weight.wrapping_mul(HASH_BASE));

        let mut hash = polynomial_hash(&bytes[..length]);
        self.repository.add_hash(hash, length, 0);

        for start in 1..=bytes.len() - length {
            let outgoing = u64::from(bytes[start - 1]).wrapping_mul(leading);
            let incoming = u64::from(bytes[start + length - 1]);
            hash = hash
                .wrapping_sub(outgoing)
                .wrapping_mul(HASH_BASE)
                .wrapping_add(incoming);
            self.repository.add_hash(hash, length, start);
        }

        self.repository.mark_indexed(length);

        let windows = bytes.len() - length + 1;
        tracing::debug!(length, windows, "indexed substring hashes");
        windows
    }

    /// First byte offset of `query` in the text, or `text.len()` if absent.
    /// An empty query matches at 0.
    pub fn search(&self, query: &str) -> usize {
        let needle = query.as_bytes();
        if needle.is_empty() {
            return 0;
        }

        let haystack = self.text.as_bytes();
        if needle.len() > haystack.len() {
            return haystack.len();
        }

        self.index_length(needle.len());

        self.repository
            .match_positions(polynomial_hash(needle), needle.len())
            .into_iter()
            .filter(|&position| &haystack[position..position + needle.len()] == needle)
            .min()
            .unwrap_or(haystack.len())
    }
}
