//! Read-only client for the Zotero web API.
//!
//! [`Zotero`] resolves a named call such as `top_level_items` into an
//! authenticated request URL, fetches it and parses the Atom response into a
//! [`Feed`]. The [`extract`] functions flatten feed entries into plain
//! records.

pub mod api;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod feed;

pub use api::{CallRegistry, Credentials, Params, Transport, Zotero};
pub use error::{ErrorKind, Result, ZoteroError};
pub use extract::{
    extract_collections, extract_items, iter_items, CollectionRecord, ItemRecords, Record,
};
pub use feed::{Content, Entry, Feed, FeedParser};
