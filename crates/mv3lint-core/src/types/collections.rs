//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec for node child lists (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec for per-variable definition lists (usually 1).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
