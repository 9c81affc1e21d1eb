/// MCP server implementation for the waste-sorting assistant.
///
/// Exposes five tools:
/// - `search_guides`: Keyword search over the category catalog
/// - `get_guide`: Look up a disposal guide by category key
/// - `list_categories`: List every category in catalog order
/// - `identify_waste`: Mock image identification (fixed result)
/// - `find_recycling_centers`: Nearby centers via the places provider
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};

use crate::identify::Identifier;
use crate::locations::CenterFinder;
use crate::search::Matcher;
use waste_common::mcp_api::{
    CategoryListResponse, CategorySummary, FindCentersParams, FindCentersResponse,
    GetGuideParams, GuideView, IdentifyWasteParams, IdentifyWasteResponse, SearchGuidesParams,
    SearchGuidesResponse,
};

#[derive(Clone)]
pub struct WasteGuideServer {
    matcher: Arc<Matcher>,
    identifier: Arc<Identifier>,
    finder: Arc<CenterFinder>,
    tool_router: ToolRouter<WasteGuideServer>,
}

impl WasteGuideServer {
    pub fn new(matcher: Arc<Matcher>, identifier: Arc<Identifier>, finder: Arc<CenterFinder>) -> Self {
        Self {
            matcher,
            identifier,
            finder,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl WasteGuideServer {
    #[tool(description = "Search the waste category guides by keyword. Returns every matching category key plus the best (first) match's full guide.")]
    async fn search_guides(
        &self,
        Parameters(params): Parameters<SearchGuidesParams>,
    ) -> Result<Json<SearchGuidesResponse>, String> {
        let category = self
            .matcher
            .select_guide(&params.query)
            .map_err(|e| e.to_string())?;

        let matches: Vec<String> = self
            .matcher
            .search(params.query.trim())
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Json(SearchGuidesResponse {
            matches,
            guide: to_guide_view(category),
        }))
    }

    #[tool(description = "Get the disposal guide for a specific category key (e.g. 'plastic', 'glass', 'hazardous').")]
    async fn get_guide(
        &self,
        Parameters(params): Parameters<GetGuideParams>,
    ) -> Result<Json<GuideView>, String> {
        let key = params.key.trim();
        if key.is_empty() {
            return Err("key must not be empty".to_string());
        }

        let category = self
            .matcher
            .catalog()
            .lookup(key)
            .ok_or_else(|| format!("no guide for category: {key}"))?;

        Ok(Json(to_guide_view(category)))
    }

    #[tool(description = "List all waste categories in canonical order with their search keywords.")]
    async fn list_categories(&self) -> Result<Json<CategoryListResponse>, String> {
        let categories = self
            .matcher
            .catalog()
            .iter()
            .map(|c| CategorySummary {
                key: c.key.clone(),
                title: c.title.clone(),
                icon: c.icon.clone(),
                keywords: c.keywords.clone(),
            })
            .collect();

        Ok(Json(CategoryListResponse { categories }))
    }

    #[tool(description = "Identify a piece of waste from an uploaded image. Mock implementation: always answers 'Plastic Bottle' with fixed confidence.")]
    async fn identify_waste(
        &self,
        Parameters(params): Parameters<IdentifyWasteParams>,
    ) -> Result<Json<IdentifyWasteResponse>, String> {
        let identification = self
            .identifier
            .identify(&params.image_name)
            .await
            .map_err(|e| e.to_string())?;

        // Mirror the original UI: unknown category renders empty instructions
        // rather than failing the identification.
        let instructions = self
            .matcher
            .catalog()
            .lookup(&identification.category)
            .map(|c| c.content.clone())
            .unwrap_or_default();

        Ok(Json(IdentifyWasteResponse {
            name: identification.name,
            category: identification.category,
            confidence_pct: (identification.confidence * 100.0).round() as u8,
            instructions,
        }))
    }

    #[tool(description = "Find recycling centers near a free-text address. Geocodes the address, then searches nearby via the places provider.")]
    async fn find_recycling_centers(
        &self,
        Parameters(params): Parameters<FindCentersParams>,
    ) -> Result<Json<FindCentersResponse>, String> {
        let address = params.address.trim();
        if address.is_empty() {
            return Err("Please enter a location to search.".to_string());
        }

        let mut response = self.finder.find(address).await.map_err(|e| e.to_string())?;
        response.places.truncate(effective_limit(params.limit));

        Ok(Json(response))
    }
}

/// Clamp the caller's result limit: default 5, never more than 20.
fn effective_limit(limit: Option<u32>) -> usize {
    limit.unwrap_or(5).min(20) as usize
}

fn to_guide_view(category: &crate::model::Category) -> GuideView {
    GuideView {
        key: category.key.clone(),
        title: category.title.clone(),
        icon: category.icon.clone(),
        content: category.content.clone(),
    }
}

#[tool_handler]
impl ServerHandler for WasteGuideServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "waste-guide".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Waste-sorting assistant MCP server. Use search_guides with a free-text \
                 term (e.g. 'bottle') to get the best-matching disposal guide, get_guide \
                 for a specific category key, list_categories to browse, identify_waste \
                 for the mock image identification, and find_recycling_centers to locate \
                 drop-off points near an address."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::cache::CenterCache;
    use crate::catalog::{builtin, Catalog};
    use crate::identify::Identifier;
    use crate::locations::CenterFinder;
    use crate::model::Category;
    use crate::search::Matcher;
    use waste_common::mcp_api::IdentifyWasteParams;
    use waste_common::places::{PlacesClient, PlacesClientConfig};
    use waste_common::redis::RedisCache;

    /// The guide and identify tools never touch the finder, so a client
    /// pointed at nothing is enough to build a server.
    fn test_server(categories: Vec<Category>) -> WasteGuideServer {
        let matcher = Arc::new(Matcher::new(Arc::new(Catalog::new(categories).unwrap())));
        let identifier = Arc::new(Identifier::new(Duration::ZERO));

        let places_config = PlacesClientConfig {
            base_url: "http://127.0.0.1:0".to_string(),
            api_key: "test-key".to_string(),
            default_timeout: Duration::from_secs(1),
            max_retries: 0,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
            max_error_body_bytes: 1024,
        };
        let places = Arc::new(PlacesClient::new(places_config).unwrap());
        let cache = Arc::new(CenterCache::new(RedisCache::new(None)));
        let finder = Arc::new(CenterFinder::new(
            places,
            cache,
            5_000,
            "recycling center".to_string(),
        ));

        WasteGuideServer::new(matcher, identifier, finder)
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = WasteGuideServer::tool_router().list_all();
        for name in [
            "search_guides",
            "get_guide",
            "list_categories",
            "identify_waste",
            "find_recycling_centers",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[test]
    fn center_limit_defaults_and_clamps() {
        assert_eq!(effective_limit(None), 5);
        assert_eq!(effective_limit(Some(3)), 3);
        assert_eq!(effective_limit(Some(20)), 20);
        assert_eq!(effective_limit(Some(50)), 20);
    }

    #[tokio::test]
    async fn identify_joins_guide_content_and_rounds_confidence() {
        let server = test_server(builtin());
        let Json(resp) = server
            .identify_waste(Parameters(IdentifyWasteParams {
                image_name: "bin.jpg".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(resp.name, "Plastic Bottle");
        assert_eq!(resp.category, "plastic");
        assert_eq!(resp.confidence_pct, 93);
        assert!(resp.instructions.contains("How to Recycle Plastic"));
    }

    #[tokio::test]
    async fn identify_with_unknown_category_renders_empty_instructions() {
        // A catalog without "plastic": identification still succeeds, the
        // missing guide just renders as empty instructions.
        let categories: Vec<Category> = builtin()
            .into_iter()
            .filter(|c| c.key != "plastic")
            .collect();
        let server = test_server(categories);

        let Json(resp) = server
            .identify_waste(Parameters(IdentifyWasteParams {
                image_name: "bin.jpg".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(resp.category, "plastic");
        assert_eq!(resp.confidence_pct, 93);
        assert!(resp.instructions.is_empty());
    }
}
