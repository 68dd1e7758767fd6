use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "zot")]
#[command(about = "Query the Zotero web API and print flattened records", long_about = None)]
pub struct Args {
    #[arg(help = "API call name, e.g. top_level_items (see --list-calls)")]
    pub call: Option<String>,

    #[arg(
        short = 'p',
        long = "param",
        value_name = "NAME=VALUE",
        value_parser = parse_key_value,
        help = "Path parameter filling a {NAME} placeholder (repeatable)"
    )]
    pub params: Vec<(String, String)>,

    #[arg(
        short = 'q',
        long = "query",
        value_name = "NAME=VALUE",
        value_parser = parse_key_value,
        help = "Query string parameter passed through as given (repeatable)"
    )]
    pub query: Vec<(String, String)>,

    #[arg(short = 'l', long = "limit", help = "Number of results to return (1-99)")]
    pub limit: Option<u32>,

    #[arg(long = "start", help = "Offset of the first result")]
    pub start: Option<u32>,

    #[arg(long = "collections", help = "Flatten entries as collections instead of items")]
    pub collections: bool,

    #[arg(long = "json", help = "Print records as JSON")]
    pub json: bool,

    #[arg(long = "raw", help = "Print the raw response body")]
    pub raw: bool,

    #[arg(long = "total", help = "Print the total number of top-level items")]
    pub total: bool,

    #[arg(long = "list-calls", help = "List the available API calls")]
    pub list_calls: bool,

    #[arg(
        long = "user-id",
        conflicts_with = "keys_file",
        help = "Zotero user id; the key still comes from ZOTERO_API_KEY, the config file or the default keys file, so both must belong to the same account"
    )]
    pub user_id: Option<String>,

    #[arg(
        long = "keys-file",
        help = "File with user id on line 1 and key on line 2; both values are taken from it"
    )]
    pub keys_file: Option<PathBuf>,

    #[arg(long = "endpoint", help = "API base URL (default https://api.zotero.org)")]
    pub endpoint: Option<String>,

    #[arg(short = 'v', long = "verbose", help = "Log requests to stderr")]
    pub verbose: bool,
}

pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}
