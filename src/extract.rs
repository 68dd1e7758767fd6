//! Flattening of parsed feeds into simple records.
//!
//! Item entries carry their metadata as a two-column table inside the
//! entry content (`<tr><th>Type</th><td>Book</td></tr>`). Each row becomes
//! one field of the record, and the entry title and key are added as
//! `Title` and `ID`.

use crate::error::{Result, ZoteroError};
use crate::feed::{Entry, Feed};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use std::collections::BTreeMap;
use std::iter::FusedIterator;

/// One flattened item: field name to text value.
pub type Record = BTreeMap<String, String>;

/// One flattened collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRecord {
    #[serde(rename = "ID")]
    pub id: String,
    pub title: String,
    /// Present only when the collection has at least one sub-collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcollections: Option<u32>,
}

/// Flatten every item entry of `feed`, in feed order.
///
/// Fails on the first entry whose content is not table markup; no partial
/// list is returned.
pub fn extract_items(feed: &Feed) -> Result<Vec<Record>> {
    iter_items(feed).collect()
}

/// Lazy form of [`extract_items`]: records are built as the iterator is
/// advanced. The iterator stops after yielding the first error.
pub fn iter_items(feed: &Feed) -> ItemRecords<'_> {
    ItemRecords {
        entries: feed.entries.iter(),
        failed: false,
    }
}

pub struct ItemRecords<'a> {
    entries: std::slice::Iter<'a, Entry>,
    failed: bool,
}

impl<'a> Iterator for ItemRecords<'a> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let record = item_record(self.entries.next()?);
        if record.is_err() {
            self.failed = true;
        }
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.entries.len()))
        }
    }
}

impl FusedIterator for ItemRecords<'_> {}

/// Flatten collection entries into `ID` / `title` / `subcollections`.
pub fn extract_collections(feed: &Feed) -> Result<Vec<CollectionRecord>> {
    feed.entries.iter().map(collection_record).collect()
}

pub fn item_record(entry: &Entry) -> Result<Record> {
    let content = entry
        .content
        .first()
        .ok_or_else(|| malformed(entry, "entry has no content"))?;

    let rows = table_rows(&content.value).map_err(|message| malformed(entry, message))?;

    let mut record: Record = rows.into_iter().collect();
    record.insert("Title".to_string(), entry.title.clone());
    record.insert("ID".to_string(), entry_key(entry).to_string());
    Ok(record)
}

pub fn collection_record(entry: &Entry) -> Result<CollectionRecord> {
    let subcollections = match entry.num_collections.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let count: i64 = raw.parse().map_err(|_| {
                malformed(entry, format!("sub-collection count '{}' is not an integer", raw))
            })?;
            if count > 0 {
                Some(u32::try_from(count).map_err(|_| {
                    malformed(entry, format!("sub-collection count {} is out of range", count))
                })?)
            } else {
                None
            }
        }
    };

    Ok(CollectionRecord {
        id: entry_key(entry).to_string(),
        title: entry.title.clone(),
        subcollections,
    })
}

fn entry_key(entry: &Entry) -> &str {
    if entry.key.is_empty() {
        &entry.id
    } else {
        &entry.key
    }
}

fn malformed(entry: &Entry, message: impl Into<String>) -> ZoteroError {
    ZoteroError::MalformedPayload {
        entry: entry_key(entry).to_string(),
        message: message.into(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Cell {
    Header,
    Data,
}

#[derive(Default)]
struct Row {
    depth: usize,
    header: Option<String>,
    data: Option<String>,
}

impl Row {
    fn set(&mut self, cell: Cell, text: String) {
        let slot = match cell {
            Cell::Header => &mut self.header,
            Cell::Data => &mut self.data,
        };
        if slot.is_none() {
            *slot = Some(text.trim().to_string());
        }
    }
}

/// Header/data text pairs of every `<tr>` in `markup`, in document order.
///
/// The markup must be a single well-formed element. Rows without a header
/// cell are skipped; a missing data cell reads as an empty string.
fn table_rows(markup: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut reader = Reader::from_str(markup);
    let mut rows = Vec::new();
    let mut depth = 0usize;
    let mut roots = 0usize;
    let mut row: Option<Row> = None;
    let mut cell: Option<(Cell, usize, String)> = None;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        match event {
            Event::Start(e) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
                match e.local_name().as_ref() {
                    b"tr" if row.is_none() => {
                        row = Some(Row {
                            depth,
                            ..Row::default()
                        })
                    }
                    b"th" if cell.is_none() => cell = Some((Cell::Header, depth, String::new())),
                    b"td" if cell.is_none() => cell = Some((Cell::Data, depth, String::new())),
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    roots += 1;
                }
                if let Some(row) = row.as_mut() {
                    match e.local_name().as_ref() {
                        b"th" if cell.is_none() => row.set(Cell::Header, String::new()),
                        b"td" if cell.is_none() => row.set(Cell::Data, String::new()),
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                if let Some((_, _, buf)) = cell.as_mut() {
                    buf.push_str(&text);
                } else if depth == 0 && !text.trim().is_empty() {
                    return Err("text outside of the table markup".to_string());
                }
            }
            Event::CData(c) => {
                if let Some((_, _, buf)) = cell.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err("unexpected closing tag".to_string());
                }
                if matches!(cell, Some((_, d, _)) if d == depth) {
                    if let (Some((kind, _, text)), Some(row)) = (cell.take(), row.as_mut()) {
                        row.set(kind, text);
                    }
                }
                if matches!(row, Some(Row { depth: d, .. }) if d == depth) {
                    if let Some(Row {
                        header: Some(header),
                        data,
                        ..
                    }) = row.take()
                    {
                        rows.push((header, data.unwrap_or_default()));
                    }
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (roots, depth) {
        (0, _) => Err("no markup element found".to_string()),
        (_, d) if d > 0 => Err("markup ends inside an open element".to_string()),
        (r, _) if r > 1 => Err("more than one top-level element".to_string()),
        _ => Ok(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_in_order() {
        let rows = table_rows(
            "<table><tr><th>Type</th><td>Book</td></tr><tr><th>Date</th><td>2011</td></tr></table>",
        )
        .unwrap();
        assert_eq!(
            rows,
            vec![
                ("Type".to_string(), "Book".to_string()),
                ("Date".to_string(), "2011".to_string())
            ]
        );
    }

    #[test]
    fn test_table_rows_nested_markup_and_entities() {
        let rows = table_rows(
            r#"<div xmlns="http://www.w3.org/1999/xhtml"><table>
                <tr class="url"><th scope="row">URL</th><td><a href="x">Q &amp; A</a></td></tr>
                <tr><th>Empty</th><td/></tr>
            </table></div>"#,
        )
        .unwrap();
        assert_eq!(rows[0], ("URL".to_string(), "Q & A".to_string()));
        assert_eq!(rows[1], ("Empty".to_string(), String::new()));
    }

    #[test]
    fn test_table_rows_rejects_bad_markup() {
        assert!(table_rows("").is_err());
        assert!(table_rows("plain text").is_err());
        assert!(table_rows("<table><tr><th>a</th></table>").is_err());
        assert!(table_rows("<table><tr><th>a</th><td>b</td></tr>").is_err());
        assert!(table_rows("<table/><table/>").is_err());
    }

    #[test]
    fn test_row_without_header_is_skipped() {
        let rows = table_rows("<table><tr><td>orphan</td></tr></table>").unwrap();
        assert!(rows.is_empty());
    }
}
