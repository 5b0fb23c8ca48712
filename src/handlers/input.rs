use serde::Deserialize;

/// A scalar the browser client may send either as a JSON number or as a
/// string (values read from `data-*` attributes arrive as text).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Number(i64),
    Text(String),
}

impl Loose {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Number(n) => Some(*n),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A positive id, or `None` when absent, blank or not a number.
pub fn id(value: Option<&Loose>) -> Option<i64> {
    value.and_then(Loose::as_i64).filter(|n| *n > 0)
}

/// Same as [`id`] for ids that arrive as path or query strings.
pub fn id_str(value: Option<&str>) -> Option<i64> {
    value
        .map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// Trimmed text, or `None` when absent or blank.
pub fn text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
