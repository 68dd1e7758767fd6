pub mod atom;

pub use atom::AtomParser;

use crate::error::Result;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field name of the total result count in [`Feed::fields`].
pub const TOTAL_RESULTS: &str = "zapi_totalresults";

/// Turns a response body into a [`Feed`].
pub trait FeedParser: Send + Sync {
    fn parse(&self, body: &str) -> Result<Feed>;
}

/// A parsed response: feed-level fields plus entries in document order.
///
/// Field names are the element names lower-cased, with a namespace prefix
/// joined by `_` (`zapi:totalResults` becomes `zapi_totalresults`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feed {
    pub fields: BTreeMap<String, String>,
    pub entries: Vec<Entry>,
}

impl Feed {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn total_results(&self) -> Option<&str> {
        self.get(TOTAL_RESULTS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entry {
    pub title: String,
    /// Atom `<id>`, a URI.
    pub id: String,
    /// `zapi:key`, the item or collection key.
    pub key: String,
    /// `zapi:numCollections`, as sent.
    pub num_collections: Option<String>,
    /// `zapi:numChildren`, as sent.
    pub num_children: Option<String>,
    pub updated: Option<DateTime<FixedOffset>>,
    pub content: Vec<Content>,
    /// Any other simple text fields of the entry.
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Content {
    pub content_type: String,
    pub value: String,
}
