use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Path templates for every supported API call. `{u}` is always the
/// stored user id; the other placeholders come from request parameters.
pub const API_METHODS: &[(&str, &str)] = &[
    ("all_items", "/users/{u}/items"),
    ("top_level_items", "/users/{u}/items/top"),
    ("specific_item", "/users/{u}/items/{item}"),
    ("child_items", "/users/{u}/items/{item}/children"),
    ("item_tags", "/users/{u}/items/{item}/tags"),
    ("user_tags", "/users/{u}/tags"),
    ("items_for_tag", "/users/{u}/tags/{tag}/items"),
    ("collections", "/users/{u}/collections"),
    ("collection_items", "/users/{u}/collections/{collection}"),
    ("sub_collections", "/users/{u}/collections/{collection}/collections"),
    ("user_groups", "/users/{u}/groups"),
    ("group_items", "/groups/{group}/items"),
    ("top_group_items", "/groups/{group}/items/top"),
    ("group_item", "/groups/{group}/items/{item}"),
    ("group_item_children", "/groups/{group}/items/{item}/children"),
    ("group_item_tags", "/groups/{group}/items/{item}/tags"),
    ("group_tags", "/groups/{group}/tags"),
    ("group_user_items_tag", "/groups/{group}/tags/{tag}/items"),
    ("group_collections", "/groups/{group}/collections"),
    ("group_collection", "/groups/{group}/collections/{collection}"),
    (
        "group_collection_sub",
        "/groups/{group}/collections/{collection}/collections",
    ),
    (
        "group_collection_items",
        "/groups/{group}/collections/{collection}/items",
    ),
    (
        "group_collection_item",
        "/groups/{group}/collections/{collection}/items/{item}",
    ),
];

pub(crate) fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"))
}

/// Immutable mapping from call name to URL template.
#[derive(Debug, Clone)]
pub struct CallRegistry {
    calls: HashMap<&'static str, &'static str>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self {
            calls: API_METHODS.iter().copied().collect(),
        }
    }

    pub fn template(&self, call: &str) -> Option<&'static str> {
        self.calls.get(call).copied()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.calls.contains_key(call)
    }

    /// Call names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        API_METHODS.iter().map(|(name, _)| *name)
    }

    /// Placeholder names used by a call's template, in path order.
    pub fn placeholders(&self, call: &str) -> Option<Vec<&'static str>> {
        let template = self.template(call)?;
        Some(
            placeholder_regex()
                .captures_iter(template)
                .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl Default for CallRegistry {
    fn default() -> Self {
        Self::new()
    }
}
