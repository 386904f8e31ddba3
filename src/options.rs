//! Permalink options and their defaults.
//!
//! Hosts hand these over as a camelCase JSON object. Every field is optional;
//! legacy spellings from older option panels (`slashAtStart`,
//! `parentRelationField`) are still accepted.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE_FIELD: &str = "title";
pub const DEFAULT_PARENT_FIELD: &str = "parent";
pub const DEFAULT_URL_PREFIX: &str = "/";
pub const DEFAULT_PLACEHOLDER: &str = "Click Generate URL to create permalink";

/// String prepended to a generated path.
///
/// Deserializes from a string or from the legacy boolean toggle
/// (`true` is `"/"`, `false` is `""`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PrefixValue", into = "String")]
pub struct UrlPrefix(String);

impl UrlPrefix {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UrlPrefix {
    fn default() -> Self {
        UrlPrefix(DEFAULT_URL_PREFIX.to_string())
    }
}

impl From<bool> for UrlPrefix {
    fn from(slash_at_start: bool) -> Self {
        if slash_at_start {
            UrlPrefix::default()
        } else {
            UrlPrefix(String::new())
        }
    }
}

impl From<&str> for UrlPrefix {
    fn from(value: &str) -> Self {
        UrlPrefix(value.to_string())
    }
}

impl From<String> for UrlPrefix {
    fn from(value: String) -> Self {
        UrlPrefix(value)
    }
}

impl From<UrlPrefix> for String {
    fn from(value: UrlPrefix) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrefixValue {
    Flag(bool),
    Text(String),
}

impl From<PrefixValue> for UrlPrefix {
    fn from(value: PrefixValue) -> Self {
        match value {
            PrefixValue::Flag(flag) => UrlPrefix::from(flag),
            PrefixValue::Text(text) => UrlPrefix(text),
        }
    }
}

/// Resolved permalink options.
///
/// Serializes in canonical form: `urlPrefix` is always a string and
/// `slashAtStart` is never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PathOptionsPatch")]
pub struct PathOptions {
    /// Attribute holding the title a segment is built from.
    pub title_field: String,
    /// Attribute holding the parent reference. Only stores read it; the
    /// builder walks the hierarchy through its resolver.
    pub parent_field: String,
    pub url_prefix: UrlPrefix,
    /// Returned verbatim when no record in the chain has a usable title.
    pub placeholder: String,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            title_field: DEFAULT_TITLE_FIELD.to_string(),
            parent_field: DEFAULT_PARENT_FIELD.to_string(),
            url_prefix: UrlPrefix::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl PathOptions {
    pub fn with_url_prefix(mut self, prefix: impl Into<UrlPrefix>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_title_field(mut self, field: impl Into<String>) -> Self {
        self.title_field = field.into();
        self
    }
}

/// A partial set of options, as sent by a host or read from a config profile.
///
/// Unset and empty-string fields leave the base value alone. When both
/// `urlPrefix` and `slashAtStart` are set, `urlPrefix` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathOptionsPatch {
    pub title_field: Option<String>,
    #[serde(alias = "parentRelationField")]
    pub parent_field: Option<String>,
    pub url_prefix: Option<UrlPrefix>,
    pub slash_at_start: Option<bool>,
    pub placeholder: Option<String>,
}

impl PathOptionsPatch {
    /// Layer the set fields over `base`.
    pub fn apply(self, mut base: PathOptions) -> PathOptions {
        if let Some(field) = non_empty(self.title_field) {
            base.title_field = field;
        }
        if let Some(field) = non_empty(self.parent_field) {
            base.parent_field = field;
        }
        if let Some(prefix) = self
            .url_prefix
            .or_else(|| self.slash_at_start.map(UrlPrefix::from))
        {
            base.url_prefix = prefix;
        }
        if let Some(placeholder) = non_empty(self.placeholder) {
            base.placeholder = placeholder;
        }
        base
    }
}

impl From<PathOptionsPatch> for PathOptions {
    fn from(patch: PathOptionsPatch) -> Self {
        patch.apply(PathOptions::default())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
