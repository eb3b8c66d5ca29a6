use serde::{Deserialize, Serialize};

/// A dynamically stored path/content record ("flat page"): a path plus an
/// opaque payload the manufacturing handler interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub path: String,
    pub data: serde_json::Value,
}

impl PageRecord {
    pub fn new(path: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }
}

/// Source of stored page records; consulted once per tree (re)build.
pub trait PageProvider: Send + Sync + std::fmt::Debug {
    fn all_records(&self) -> Vec<PageRecord>;
}

/// An in-memory provider, useful for tests and static deployments.
#[derive(Debug, Default)]
pub struct StaticPageProvider {
    records: Vec<PageRecord>,
}

impl StaticPageProvider {
    pub fn new(records: Vec<PageRecord>) -> Self {
        Self { records }
    }
}

impl PageProvider for StaticPageProvider {
    fn all_records(&self) -> Vec<PageRecord> {
        self.records.clone()
    }
}
