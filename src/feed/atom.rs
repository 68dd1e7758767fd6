use super::{Content, Entry, Feed, FeedParser};
use crate::error::{Result, ZoteroError};
use chrono::DateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Atom feed parser for the responses the API sends with `format=atom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomParser;

impl FeedParser for AtomParser {
    fn parse(&self, body: &str) -> Result<Feed> {
        parse_feed(body)
    }
}

pub fn parse_feed(body: &str) -> Result<Feed> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut feed = Feed::default();
    let mut entry: Option<Entry> = None;
    // Names of the currently open elements, outermost first.
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut saw_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| feed_error(&reader, e))?;
        match event {
            Event::Start(e) => {
                let name = field_name(e.name().as_ref());
                if stack.is_empty() {
                    check_root(&name, saw_root)?;
                    saw_root = true;
                }
                if name == "entry" && stack.len() == 1 {
                    entry = Some(Entry::default());
                } else if name == "content" && stack.len() == 2 {
                    if let Some(entry) = entry.as_mut() {
                        let content_type = content_type(&e)?;
                        let value = read_content(&mut reader, body, &content_type)?;
                        entry.content.push(Content {
                            content_type,
                            value,
                        });
                        continue;
                    }
                }
                stack.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                let name = field_name(e.name().as_ref());
                if stack.is_empty() {
                    check_root(&name, saw_root)?;
                    saw_root = true;
                }
                if name == "content" && stack.len() == 2 {
                    if let Some(entry) = entry.as_mut() {
                        entry.content.push(Content {
                            content_type: content_type(&e)?,
                            value: String::new(),
                        });
                    }
                }
            }
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| feed_error(&reader, e))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(_) => {
                let name = stack.pop().unwrap_or_default();
                let value = std::mem::take(&mut text).trim().to_string();
                match (name.as_str(), stack.len()) {
                    ("entry", 1) => {
                        if let Some(done) = entry.take() {
                            feed.entries.push(done);
                        }
                    }
                    (_, 1) => {
                        if !value.is_empty() || !feed.fields.contains_key(&name) {
                            feed.fields.insert(name, value);
                        }
                    }
                    (_, 2) => {
                        if let Some(entry) = entry.as_mut() {
                            set_entry_field(entry, name, value);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ZoteroError::Feed(format!(
            "document ended inside <{}>",
            stack.join("> <")
        )));
    }
    if !saw_root {
        return Err(ZoteroError::Feed("response contains no <feed> element".to_string()));
    }

    log::trace!(
        "parsed feed with {} fields and {} entries",
        feed.fields.len(),
        feed.entries.len()
    );
    Ok(feed)
}

fn check_root(name: &str, saw_root: bool) -> Result<()> {
    if saw_root {
        return Err(ZoteroError::Feed("multiple root elements".to_string()));
    }
    if name != "feed" {
        return Err(ZoteroError::Feed(format!(
            "expected <feed> root element, found <{}>",
            name
        )));
    }
    Ok(())
}

fn set_entry_field(entry: &mut Entry, name: String, value: String) {
    match name.as_str() {
        "title" => entry.title = value,
        "id" => entry.id = value,
        "zapi_key" => entry.key = value,
        "zapi_numcollections" => entry.num_collections = Some(value),
        "zapi_numchildren" => entry.num_children = Some(value),
        "updated" => match DateTime::parse_from_rfc3339(&value) {
            Ok(ts) => entry.updated = Some(ts),
            Err(_) => {
                entry.fields.insert(name, value);
            }
        },
        _ => {
            entry.fields.insert(name, value);
        }
    }
}

/// Read everything up to the matching `</content>`.
///
/// Inline XML content is returned as its raw inner markup; other content
/// types are returned as their unescaped text.
fn read_content(reader: &mut Reader<&[u8]>, body: &str, content_type: &str) -> Result<String> {
    let inline_markup = content_type == "xhtml" || content_type.ends_with("xml");
    let start = reader.buffer_position() as usize;
    let mut depth = 0usize;
    let mut text = String::new();

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event().map_err(|e| feed_error(reader, e))? {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => {
                if !inline_markup {
                    return Ok(text.trim().to_string());
                }
                return body
                    .get(start..before)
                    .map(|raw| raw.trim().to_string())
                    .ok_or_else(|| ZoteroError::Feed("content markup is not valid text".to_string()));
            }
            Event::End(_) => depth -= 1,
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| feed_error(reader, e))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Eof => {
                return Err(ZoteroError::Feed(
                    "document ended inside <content>".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn content_type(start: &BytesStart) -> Result<String> {
    let attr = start
        .try_get_attribute("type")
        .map_err(|e| ZoteroError::Feed(format!("bad content attribute: {}", e)))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| ZoteroError::Feed(format!("bad content type: {}", e)))?;
            Ok(value.into_owned())
        }
        None => Ok("text".to_string()),
    }
}

/// `zapi:numCollections` -> `zapi_numcollections`
fn field_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).replace(':', "_").to_lowercase()
}

fn feed_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> ZoteroError {
    ZoteroError::Feed(format!(
        "{} (at byte {})",
        err,
        reader.buffer_position()
    ))
}
