use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// JSON-encoded `SearchOptions`, passed through verbatim by clients.
    pub opts: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoadQuery {
    pub k: Option<String>,
    pub ix: Option<String>,
    pub limit: Option<String>,
}
