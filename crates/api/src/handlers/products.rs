//! Handlers for the `/products` resource.
//!
//! Reads are open to any authenticated identity; writes require `admin`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_db::models::product::Product;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::services::{NewProduct, ProductPatch};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Product name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Request body for `PATCH /products/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Product name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.products.list(&user.actor()).await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.get(&user.actor(), id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state
        .products
        .create(
            &admin.actor(),
            NewProduct {
                name: input.name,
                description: input.description,
                price: input.price,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            product,
            "Product created successfully",
        )),
    ))
}

/// PATCH /api/v1/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .products
        .update(
            &admin.actor(),
            id,
            ProductPatch {
                name: input.name,
                description: input.description,
                price: input.price,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        product,
        "Product updated successfully",
    )))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    state.products.delete(&admin.actor(), id).await?;
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}
