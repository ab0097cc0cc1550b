use serde::{Deserialize, Serialize};

/// Capability references an agent or task may be granted
///
/// These are references only; the concrete tool behind each kind is wired in
/// by the infrastructure layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Free-text web search returning ranked snippets
    WebSearch,
    /// Fetches a URL and returns the extracted page text
    ScrapeWebsite,
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolKind::WebSearch => write!(f, "web_search"),
            ToolKind::ScrapeWebsite => write!(f, "scrape_website"),
        }
    }
}
