use crate::api::Credentials;
use crate::error::{Result, ZoteroError};
use std::fs;
use std::path::Path;

/// Read a keys file: user id on the first line, API key on the second.
///
/// Line endings and surrounding whitespace are stripped; later lines are
/// ignored.
pub fn read_credentials(path: &Path) -> Result<Credentials> {
    let contents = fs::read_to_string(path)?;
    parse_credentials(&contents)
}

pub fn parse_credentials(contents: &str) -> Result<Credentials> {
    let mut lines = contents.lines().map(str::trim);
    match (lines.next(), lines.next()) {
        (Some(user_id), Some(user_key)) if !user_id.is_empty() && !user_key.is_empty() => {
            Ok(Credentials {
                user_id: user_id.to_string(),
                user_key: user_key.to_string(),
            })
        }
        _ => Err(ZoteroError::Other(
            "keys file must hold the user id on line 1 and the API key on line 2".to_string(),
        )),
    }
}
