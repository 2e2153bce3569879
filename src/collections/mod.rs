pub mod hashtable;

use std::hash::BuildHasherDefault;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

pub use hashtable::HashtableMap;


/// Hasher used by every map in the crate
pub type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Use indexmap for fast lookups and rustc_hash for fast hashing
pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub(crate) type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;
