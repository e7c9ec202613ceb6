use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Id carried by a service that has not been saved yet.
pub const UNASSIGNED_ID: i64 = i64::MIN;

/// A client application the authentication server recognises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredService {
    #[serde(default = "unassigned")]
    pub id: i64,
    pub name: String,
    /// URL pattern. A leading `^` marks a regular expression, anything else is Ant-style.
    pub service_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub evaluation_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

fn unassigned() -> i64 {
    UNASSIGNED_ID
}

impl RegisteredService {
    pub fn new(name: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            service_id: service_id.into(),
            description: String::new(),
            evaluation_order: 0,
            theme: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_evaluation_order(mut self, order: i32) -> Self {
        self.evaluation_order = order;
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    /// Whether `url` is covered by this service's pattern.
    ///
    /// An invalid pattern never matches.
    pub fn matches(&self, url: &str) -> bool {
        match compile_pattern(&self.service_id) {
            Ok(re) => re.is_match(url),
            Err(err) => {
                tracing::warn!(id = self.id, pattern = %self.service_id, "invalid service pattern: {}", err);
                false
            }
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(body) = pattern.strip_prefix('^') {
        return Regex::new(&format!("^(?:{})$", body));
    }

    let mut re = String::with_capacity(pattern.len() * 2 + 2);
    re.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                re.push_str(".*");
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re)
}

/// Orders services the way they are evaluated: ascending evaluation order, then id.
pub fn sort_by_evaluation_order(services: &mut [RegisteredService]) {
    services.sort_by(|a, b| {
        a.evaluation_order
            .cmp(&b.evaluation_order)
            .then(a.id.cmp(&b.id))
    });
}
