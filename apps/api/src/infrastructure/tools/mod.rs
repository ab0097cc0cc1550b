// Tool adapters used by the agents

pub mod scrape;
pub mod serper;

use std::sync::Arc;

use reqwest::Client;

pub use scrape::ScrapeWebsiteTool;
pub use serper::SerperSearchTool;

use crate::agents::tools::ToolBox;
use crate::config::AppConfig;
use crate::domain::crew::ToolKind;

/// Registers the concrete tool behind every capability reference
pub fn default_toolbox(client: Client, config: &AppConfig) -> ToolBox {
    ToolBox::new()
        .with_tool(
            ToolKind::WebSearch,
            Arc::new(SerperSearchTool::new(client.clone(), config.serper.clone())),
        )
        .with_tool(
            ToolKind::ScrapeWebsite,
            Arc::new(ScrapeWebsiteTool::new(client, config.scrape_max_chars)),
        )
}
