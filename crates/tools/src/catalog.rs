//! Product catalog tool — fetch the product list over HTTP.
//!
//! A thin GET + JSON-parse wrapper around the catalog service, with an
//! optional case-insensitive category filter. Fetch or parse failures are
//! reported as failed tool results, never as fatal errors.

use async_trait::async_trait;
use drafter_core::error::ToolError;
use drafter_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!("drafter/", env!("CARGO_PKG_VERSION"));

/// One product as served by the catalog endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub in_stock: bool,
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

pub struct CatalogTool {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogTool {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "list_products".into(),
                reason: format!("HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    async fn fetch_products(&self) -> Option<Vec<Product>> {
        let response = self
            .client
            .get(&self.base_url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;

        response.json::<Vec<Product>>().await.ok()
    }
}

#[async_trait]
impl Tool for CatalogTool {
    fn name(&self) -> &str {
        "list_products"
    }

    fn description(&self) -> &str {
        "List all products from the catalog, optionally filtered by category \
         (e.g. electronics)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Optional product category to filter by"
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let category = arguments["category"].as_str();

        let Some(products) = self.fetch_products().await else {
            return Ok(ToolResult::failed("Unable to fetch product data."));
        };
        debug!(count = products.len(), "Fetched product catalog");

        Ok(summarize(&products, category))
    }
}

/// Render the fetched catalog, applying the optional category filter.
///
/// An empty catalog is indistinguishable from no data and is reported the
/// same way as a failed fetch; the per-category message only fires when
/// products exist but none match the filter.
fn summarize(products: &[Product], category: Option<&str>) -> ToolResult {
    if products.is_empty() {
        return ToolResult::failed("Unable to fetch product data.");
    }

    let filtered: Vec<&Product> = match category {
        Some(wanted) => products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(wanted))
            .collect(),
        None => products.iter().collect(),
    };

    if filtered.is_empty() {
        let label = category.unwrap_or_default();
        return ToolResult::failed(format!("No products found in category '{label}'."));
    }

    ToolResult::ok(format_products(&filtered))
}

/// Render products in the catalog's block format.
fn format_products(products: &[&Product]) -> String {
    products
        .iter()
        .map(|p| {
            format!(
                "ID: {}\nName: {}\nCategory: {}\nPrice: ${:.2}\nIn Stock: {}\nRating: {}/5\nTags: {}\nCreated At: {}\n-----",
                p.id,
                p.name,
                p.category,
                p.price,
                if p.in_stock { "Yes" } else { "No" },
                p.rating,
                p.tags.join(", "),
                p.created_at,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_products() -> Vec<Product> {
        serde_json::from_value(json!([
            {
                "id": 1,
                "name": "Wireless Mouse",
                "category": "electronics",
                "price": 24.99,
                "in_stock": true,
                "rating": 4.5,
                "tags": ["wireless", "usb"],
                "created_at": "2024-01-10"
            },
            {
                "id": 2,
                "name": "Desk Lamp",
                "category": "home",
                "price": 18.0,
                "in_stock": false,
                "rating": 4.0,
                "tags": ["led"],
                "created_at": "2024-02-03"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn product_json_parses_catalog_wire_format() {
        let products = sample_products();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Wireless Mouse");
        assert!(products[0].in_stock);
        assert!(!products[1].in_stock);
    }

    #[test]
    fn formatting_matches_block_layout() {
        let products = sample_products();
        let refs: Vec<&Product> = products.iter().collect();
        let output = format_products(&refs);

        assert!(output.contains("ID: 1"));
        assert!(output.contains("Name: Wireless Mouse"));
        assert!(output.contains("Price: $24.99"));
        assert!(output.contains("In Stock: Yes"));
        assert!(output.contains("In Stock: No"));
        assert!(output.contains("Tags: wireless, usb"));
        assert!(output.contains("-----"));
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let products = sample_products();
        let result = summarize(&products, Some("Electronics"));
        assert!(result.success);
        assert!(result.output.contains("ID: 1"));
        assert!(!result.output.contains("ID: 2"));
    }

    #[test]
    fn empty_catalog_reports_no_data_not_empty_category() {
        let result = summarize(&[], None);
        assert!(!result.success);
        assert_eq!(result.output, "Unable to fetch product data.");

        // Same for an empty catalog with a filter
        let result = summarize(&[], Some("electronics"));
        assert!(!result.success);
        assert_eq!(result.output, "Unable to fetch product data.");
    }

    #[test]
    fn unmatched_category_reports_the_category() {
        let products = sample_products();
        let result = summarize(&products, Some("toys"));
        assert!(!result.success);
        assert_eq!(result.output, "No products found in category 'toys'.");
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_fetch_failure() {
        // Port 9 (discard) is not serving HTTP; the request fails fast.
        let tool = CatalogTool::new("http://127.0.0.1:9/api/products").unwrap();
        let result = tool.execute(json!({})).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.output, "Unable to fetch product data.");
    }

    #[test]
    fn tool_definition() {
        let tool = CatalogTool::new("http://localhost:3000/api/products").unwrap();
        let def = tool.to_definition();
        assert_eq!(def.name, "list_products");
        assert!(def.parameters["properties"]["category"].is_object());
    }
}
