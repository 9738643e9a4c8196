//! Plain-text bodies returned by the entry routes.

use crate::store::Snapshot;

/// Static page served at `/`.
pub const WELCOME_PAGE: &str = "<html><body><p>Welcome!</p></body></html>";

/// `Read entry: s.data[<key>] = <value>`; a missing value renders as empty.
pub fn entry(key: &str, value: Option<&str>) -> String {
    format!("Read entry: s.data[{}] = {}", key, value.unwrap_or_default())
}

/// `Read list: map[<k>:<v> ...]`.
pub fn list(snapshot: &Snapshot) -> String {
    format!("Read list: {}", map_listing(snapshot))
}

/// `Updated: s.data[<key>] = <value>`.
pub fn updated(key: &str, value: &str) -> String {
    format!("Updated: s.data[{}] = {}", key, value)
}

/// Space-separated `key:value` pairs inside `map[...]`, in key order.
pub fn map_listing(snapshot: &Snapshot) -> String {
    let body = snapshot
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("map[{body}]")
}
