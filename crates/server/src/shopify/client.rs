//! Production Shopify Admin API client.
//!
//! REST for catalog paging and order creation, hand-rolled GraphQL for SKU
//! search and draft orders. Credentials arrive per request in an
//! [`AuthContext`]; the client itself holds no shop state.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;

use super::types::{
    CatalogProduct, CreatedOrder, DraftOrderInput, OrderInput, ProductPage, ResolvedVariant,
    UserError,
};
use super::{ShopifyApi, ShopifyError};
use crate::auth::AuthContext;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Products fetched per REST page. Shopify caps this at 250.
const PRODUCTS_PAGE_LIMIT: u32 = 250;

/// Shopify Admin API client over reqwest.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    api_version: String,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
}

impl AdminClient {
    /// Create a client pinned to one Admin API version.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(api_version: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_version: api_version.into(),
        }
    }

    fn rest_url(&self, auth: &AuthContext, resource: &str) -> String {
        format!(
            "https://{}/admin/api/{}/{resource}",
            auth.shop_domain, self.api_version
        )
    }

    /// Execute a GraphQL query against the shop's `graphql.json` endpoint.
    #[instrument(skip(self, auth, query, variables), fields(shop = %auth.shop_domain))]
    async fn execute<T: DeserializeOwned>(
        &self,
        auth: &AuthContext,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let body = json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .client
            .post(self.rest_url(auth, "graphql.json"))
            .header(ACCESS_TOKEN_HEADER, auth.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized);
        }

        let graphql_response: GraphQLResponse<T> = response.json().await?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        graphql_response
            .data
            .ok_or_else(|| ShopifyError::Parse("No data in GraphQL response".to_string()))
    }

    async fn check_rest_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ShopifyError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ShopifyApi for AdminClient {
    #[instrument(skip(self, auth), fields(shop = %auth.shop_domain))]
    async fn list_products(
        &self,
        auth: &AuthContext,
        page_info: Option<&str>,
    ) -> Result<ProductPage, ShopifyError> {
        let mut request = self
            .client
            .get(self.rest_url(auth, "products.json"))
            .header(ACCESS_TOKEN_HEADER, auth.access_token.expose_secret())
            .query(&[("limit", PRODUCTS_PAGE_LIMIT.to_string())]);

        if let Some(cursor) = page_info {
            request = request.query(&[("page_info", cursor)]);
        }

        let response = Self::check_rest_response(request.send().await?).await?;

        let next_page = response
            .headers()
            .get("Link")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_page_info);

        #[derive(Deserialize)]
        struct Body {
            products: Vec<CatalogProduct>,
        }

        let body: Body = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;

        Ok(ProductPage {
            products: body.products,
            next_page,
        })
    }

    #[instrument(skip(self, auth), fields(shop = %auth.shop_domain, sku = %sku))]
    async fn search_variant_by_sku(
        &self,
        auth: &AuthContext,
        sku: &str,
    ) -> Result<Option<ResolvedVariant>, ShopifyError> {
        let query = r"
            query FindVariantBySku($query: String!) {
                products(first: 1, query: $query) {
                    edges {
                        node {
                            variants(first: 1) {
                                edges {
                                    node {
                                        id
                                        price
                                    }
                                }
                            }
                        }
                    }
                }
            }
        ";

        #[derive(Deserialize)]
        struct Response {
            products: Connection<Product>,
        }
        #[derive(Deserialize)]
        struct Product {
            variants: Connection<Variant>,
        }
        #[derive(Deserialize)]
        struct Variant {
            id: String,
            price: Option<String>,
        }
        #[derive(Deserialize)]
        struct Connection<T> {
            edges: Vec<Edge<T>>,
        }
        #[derive(Deserialize)]
        struct Edge<T> {
            node: T,
        }

        let response: Response = self
            .execute(auth, query, json!({"query": format!("sku:{sku}")}))
            .await?;

        Ok(response
            .products
            .edges
            .into_iter()
            .next()
            .and_then(|p| p.node.variants.edges.into_iter().next())
            .map(|v| ResolvedVariant {
                variant_id: order_bridge_core::VariantId::new(v.node.id),
                price: v.node.price,
            }))
    }

    #[instrument(skip(self, auth, order), fields(shop = %auth.shop_domain))]
    async fn create_order(
        &self,
        auth: &AuthContext,
        order: &OrderInput,
    ) -> Result<CreatedOrder, ShopifyError> {
        let response = self
            .client
            .post(self.rest_url(auth, "orders.json"))
            .header(ACCESS_TOKEN_HEADER, auth.access_token.expose_secret())
            .json(&json!({"order": order}))
            .send()
            .await?;

        let response = Self::check_rest_response(response).await?;

        #[derive(Deserialize)]
        struct Body {
            order: CreatedOrder,
        }

        let body: Body = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(body.order)
    }

    #[instrument(skip(self, auth, draft), fields(shop = %auth.shop_domain))]
    async fn create_draft_order(
        &self,
        auth: &AuthContext,
        draft: &DraftOrderInput,
    ) -> Result<CreatedOrder, ShopifyError> {
        let mutation = r"
            mutation CreateDraftOrder($input: DraftOrderInput!) {
                draftOrderCreate(input: $input) {
                    draftOrder {
                        id
                        name
                        invoiceUrl
                        totalPrice
                    }
                    userErrors {
                        field
                        message
                    }
                }
            }
        ";

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            draft_order_create: DraftOrderCreate,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct DraftOrderCreate {
            draft_order: Option<CreatedOrder>,
            #[serde(default)]
            user_errors: Vec<UserError>,
        }

        let response: Response = self
            .execute(auth, mutation, json!({"input": draft}))
            .await?;

        let result = response.draft_order_create;
        if !result.user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(result.user_errors));
        }

        result
            .draft_order
            .ok_or_else(|| ShopifyError::Parse("draftOrderCreate returned no draft order".to_string()))
    }
}

/// Extract the `page_info` cursor for `rel="next"` from a `Link` header.
///
/// Shopify's header looks like:
/// `<https://shop/admin/api/2026-01/products.json?page_info=abc&limit=250>; rel="next"`
/// with an optional `rel="previous"` entry before it.
fn parse_next_page_info(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|part| {
        if !part.contains("rel=\"next\"") {
            return None;
        }
        let url = part.split('<').nth(1)?.split('>').next()?;
        url.split('?')
            .nth(1)?
            .split('&')
            .find_map(|pair| pair.strip_prefix("page_info="))
            .map(ToString::to_string)
    })
}
