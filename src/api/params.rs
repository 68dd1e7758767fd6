use std::fmt::Display;

/// Ordered name/value mapping used for path placeholders and query strings.
///
/// Inserting an existing name replaces its value in place, so the original
/// position is kept. Values are stored as text; nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(k, _)| k == name)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `atom` or `bib`
    pub fn format(self, value: &str) -> Self {
        self.with("format", value)
    }

    pub fn version(self, value: u32) -> Self {
        self.with("version", value)
    }

    /// `none`, `html` or `bib`
    pub fn content(self, value: &str) -> Self {
        self.with("content", value)
    }

    pub fn order(self, field: &str) -> Self {
        self.with("order", field)
    }

    /// `asc` or `desc`
    pub fn sort(self, value: &str) -> Self {
        self.with("sort", value)
    }

    /// The service accepts 1 to 99; the value is sent as given.
    pub fn limit(self, value: u32) -> Self {
        self.with("limit", value)
    }

    pub fn start(self, value: u32) -> Self {
        self.with("start", value)
    }

    pub fn pprint(self, value: bool) -> Self {
        self.with("pprint", value)
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Display, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = Params::from([("limit", "5"), ("start", "0")]);
        params.insert("limit", 10);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("limit", "10"), ("start", "0")]);
    }

    #[test]
    fn test_convenience_setters_pass_values_through() {
        let params = Params::new().limit(250).sort("sideways").pprint(true);
        assert_eq!(params.get("limit"), Some("250"));
        assert_eq!(params.get("sort"), Some("sideways"));
        assert_eq!(params.get("pprint"), Some("true"));
    }

    #[test]
    fn test_remove() {
        let mut params = Params::from([("a", 1), ("b", 2)]);
        assert_eq!(params.remove("a"), Some("1".to_string()));
        assert_eq!(params.remove("a"), None);
        assert_eq!(params.len(), 1);
    }
}
