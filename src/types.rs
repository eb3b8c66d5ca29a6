use hashbrown::HashMap;
use smallvec::SmallVec;

/// Variables extracted from a matched path, keyed by variable name.
pub type UrlArgs = HashMap<String, String>;

/// Per-call capture accumulator used while a resolution is in flight.
pub type CapturedArgs = SmallVec<[(String, String); 4]>;

/// Index of a node inside its owning tree's arena.
pub type NodeId = usize;
