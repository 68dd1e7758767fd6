use super::params::Params;
use super::registry::{placeholder_regex, CallRegistry};
use super::transport::{redact_key, HttpTransport, Transport};
use crate::error::{Result, ZoteroError};
use crate::feed::{AtomParser, Feed, FeedParser};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://api.zotero.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub user_key: String,
}

/// Client for the Zotero read API.
///
/// Credentials, endpoint and call registry are fixed at construction. Every
/// fetch is one blocking GET; nothing is cached or retried.
pub struct Zotero {
    credentials: Option<Credentials>,
    endpoint: Url,
    registry: CallRegistry,
    transport: Box<dyn Transport>,
    parser: Box<dyn FeedParser>,
}

impl Zotero {
    /// Credentials are kept only when both id and key are non-empty.
    pub fn new(user_id: Option<&str>, user_key: Option<&str>) -> Result<Self> {
        Ok(Self::with_transport(
            user_id,
            user_key,
            Box::new(HttpTransport::new()?),
        ))
    }

    pub fn with_transport(
        user_id: Option<&str>,
        user_key: Option<&str>,
        transport: Box<dyn Transport>,
    ) -> Self {
        let credentials = match (user_id, user_key) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => Some(Credentials {
                user_id: id.to_string(),
                user_key: key.to_string(),
            }),
            _ => None,
        };

        Self {
            credentials,
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            registry: CallRegistry::new(),
            transport,
            parser: Box::new(AtomParser),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Url::parse(endpoint)?;
        Ok(self)
    }

    pub fn with_parser(mut self, parser: Box<dyn FeedParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    /// Resolve `call` into the full request URL without fetching it.
    ///
    /// With `request_params`, `u` is set to the stored user id (replacing any
    /// caller value) and every placeholder must be present. Without them only
    /// `{u}` is filled. The user key is always sent as the `key` query
    /// parameter, after the caller's own query parameters.
    pub fn build_url(
        &self,
        call: &str,
        url_params: Option<&Params>,
        request_params: Option<&Params>,
    ) -> Result<Url> {
        let template = self
            .registry
            .template(call)
            .ok_or_else(|| ZoteroError::UnknownCall(call.to_string()))?;
        let mut path_params = request_params.cloned().unwrap_or_default();
        match &self.credentials {
            Some(credentials) => path_params.insert("u", &credentials.user_id),
            None => {
                path_params.remove("u");
            }
        }

        let segments = resolve_path(call, template, &path_params).map_err(|e| match e {
            ZoteroError::MissingParameter { ref param, .. }
                if param == "u" && self.credentials.is_none() =>
            {
                ZoteroError::CredentialAbsent
            }
            other => other,
        })?;
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ZoteroError::CredentialAbsent)?;

        let mut url = self.endpoint.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ZoteroError::Other(format!("endpoint {} cannot take a path", self.endpoint)))?;
            path.pop_if_empty();
            path.extend(segments.iter());
        }

        let mut query = url_params.cloned().unwrap_or_default();
        query.remove("key");
        query.insert("key", &credentials.user_key);
        url.query_pairs_mut().clear().extend_pairs(query.iter());

        log::debug!("resolved {} -> {}", call, redact_key(&url));
        Ok(url)
    }

    /// Fetch `call` and return the response body unparsed.
    pub fn retrieve_raw(
        &self,
        call: &str,
        url_params: Option<&Params>,
        request_params: Option<&Params>,
    ) -> Result<String> {
        let url = self.build_url(call, url_params, request_params)?;
        self.transport.get(&url)
    }

    /// Fetch `call` and parse the response as a feed.
    pub fn retrieve_data(
        &self,
        call: &str,
        url_params: Option<&Params>,
        request_params: Option<&Params>,
    ) -> Result<Feed> {
        let body = self.retrieve_raw(call, url_params, request_params)?;
        self.parser.parse(&body)
    }

    /// Total number of top-level items in the library, as reported by the feed.
    pub fn total_items(&self) -> Result<String> {
        let feed = self.retrieve_data("top_level_items", Some(&Params::new().limit(1)), None)?;
        feed.total_results()
            .map(str::to_string)
            .ok_or_else(|| ZoteroError::Feed("feed has no total result count".to_string()))
    }
}

/// Substitute placeholders segment by segment. Returned segments are raw
/// text; `Url::path_segments_mut` percent-encodes them.
fn resolve_path(call: &str, template: &str, params: &Params) -> Result<Vec<String>> {
    let re = placeholder_regex();
    let mut segments = Vec::new();

    for segment in template.split('/').filter(|s| !s.is_empty()) {
        let mut resolved = String::with_capacity(segment.len());
        let mut last = 0;
        for cap in re.captures_iter(segment) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            let value = params
                .get(name.as_str())
                .ok_or_else(|| ZoteroError::MissingParameter {
                    call: call.to_string(),
                    param: name.as_str().to_string(),
                })?;
            resolved.push_str(&segment[last..whole.start()]);
            resolved.push_str(value);
            last = whole.end();
        }
        resolved.push_str(&segment[last..]);
        segments.push(resolved);
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_substitutes_each_placeholder() {
        let params = Params::from([("u", "12345"), ("item", "ABC")]);
        let segments = resolve_path("child_items", "/users/{u}/items/{item}/children", &params).unwrap();
        assert_eq!(segments, vec!["users", "12345", "items", "ABC", "children"]);
    }

    #[test]
    fn test_resolve_path_does_not_rescan_values() {
        let params = Params::from([("u", "{item}")]);
        let segments = resolve_path("all_items", "/users/{u}/items", &params).unwrap();
        assert_eq!(segments, vec!["users", "{item}", "items"]);
    }

    #[test]
    fn test_resolve_path_reports_missing_name() {
        let params = Params::from([("u", "1")]);
        match resolve_path("group_items", "/groups/{group}/items", &params) {
            Err(ZoteroError::MissingParameter { call, param }) => {
                assert_eq!(call, "group_items");
                assert_eq!(param, "group");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
