use axum::{
    extract::{Path, State},
    response::Html,
};

use service::entries::EntryService;

/// GET /entry/:key
///
/// A key that does not decode to UTF-8 is rejected by the extractor (400).
pub async fn show_entry(
    State(entries): State<EntryService>,
    Path(key): Path<String>,
) -> String {
    entries.show(Some(&key)).await
}

/// GET /list
pub async fn list_entries(State(entries): State<EntryService>) -> String {
    entries.list().await
}

/// PUT /entry/:key/:value
pub async fn update_entry(
    State(entries): State<EntryService>,
    Path((key, value)): Path<(String, String)>,
) -> String {
    entries.update(key, value).await
}

/// GET /
pub async fn welcome(State(entries): State<EntryService>) -> Html<&'static str> {
    Html(entries.welcome())
}
