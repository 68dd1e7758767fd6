use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Expand environment variables in a string using ${VAR_NAME} syntax
pub fn expand_env_var_in_string(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

/// Like [`expand_env_var_in_string`] with a caller-supplied lookup.
/// Unknown variables are left as written.
pub fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

    re.replace_all(value, |cap: &regex::Captures| {
        lookup(&cap[1]).unwrap_or_else(|| cap[0].to_string())
    })
    .into_owned()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
