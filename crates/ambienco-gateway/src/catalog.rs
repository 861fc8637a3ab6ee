//! Product catalog: public browsing, admin maintenance.

use crate::error::{ok, ok_message, ApiError, ApiResult};
use crate::middleware::AdminSession;
use crate::records::{NewProduct, Product, ProductCategory, ProductUpdate, PRODUCT_PREFIX};
use crate::server::AppState;
use ambienco_core::AmbiencoError;
use ambienco_store::{KvStore, KvStoreExt};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

async fn all_products(state: &AppState) -> ApiResult<Vec<Product>> {
    let mut products: Vec<Product> = state.store.get_by_prefix_as(PRODUCT_PREFIX).await?;
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(products)
}

async fn load_product(state: &AppState, id: &str) -> ApiResult<Product> {
    state
        .store
        .get_as(&Product::key(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

pub(crate) async fn list_products(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    ok(all_products(&state).await?)
}

/// `GET /products/{category}`.
pub(crate) async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let category: ProductCategory = category.parse()?;
    let products: Vec<Product> = all_products(&state)
        .await?
        .into_iter()
        .filter(|p| p.category == category)
        .collect();
    ok(products)
}

pub(crate) async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    ok(load_product(&state, &id).await?)
}

pub(crate) async fn create_product(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(body) = payload?;
    let product = body.into_product(&state.sanitizer)?;
    state.store.set_as(&Product::key(&product.id), &product).await?;
    info!(product_id = %product.id, category = %product.category, "Product created");
    Ok((StatusCode::CREATED, ok(product)?))
}

/// `PUT /products/{id}`.
pub(crate) async fn update_product(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(update) = payload?;
    let sanitizer = &state.sanitizer;
    let product: Product = state
        .store
        .update_as(&Product::key(&id), |current: Option<Product>| {
            let mut product = current
                .ok_or_else(|| AmbiencoError::NotFound("Product not found".to_string()))?;
            update.apply(&mut product, sanitizer)?;
            Ok(product)
        })
        .await?;
    info!(product_id = %id, "Product updated");
    ok(product)
}

/// `DELETE /products/{id}`.
pub(crate) async fn delete_product(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    if !state.store.del(&Product::key(&id)).await? {
        return Err(ApiError::not_found("Product not found"));
    }
    info!(product_id = %id, "Product deleted");
    Ok(ok_message("Product deleted"))
}
