use std::path::PathBuf;

pub fn default_endpoint() -> String {
    crate::api::DEFAULT_ENDPOINT.to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

/// `~/zotero_keys.txt`: user id on line 1, key on line 2.
pub fn default_keys_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("zotero_keys.txt"))
}
