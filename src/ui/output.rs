use colored::*;
use zotero_feed::{CallRegistry, CollectionRecord, Record};

/// Print item records, one block per record, `Title` and `ID` first.
pub fn display_records(records: &[Record]) {
    for (idx, record) in records.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        let title = record.get("Title").map(String::as_str).unwrap_or("");
        let id = record.get("ID").map(String::as_str).unwrap_or("");
        println!("{} {}", title.bold(), format!("[{}]", id).dimmed());
        for (name, value) in record {
            if name == "Title" || name == "ID" {
                continue;
            }
            println!("  {}: {}", name.cyan(), value);
        }
    }
}

pub fn display_collections(collections: &[CollectionRecord]) {
    for collection in collections {
        let subs = match collection.subcollections {
            Some(n) => format!(" ({} sub-collections)", n).dimmed().to_string(),
            None => String::new(),
        };
        println!(
            "{} {}{}",
            collection.title.bold(),
            format!("[{}]", collection.id).dimmed(),
            subs
        );
    }
}

pub fn display_calls(registry: &CallRegistry) {
    for name in registry.names() {
        let template = registry.template(name).unwrap_or_default();
        println!("{:<24} {}", name.green(), template.dimmed());
    }
}

/// Verbose diagnostic line on stderr.
pub fn verbose(message: &str) {
    eprintln!("{}", format!("[zot] {}", message).dimmed());
}
