//! Product route handlers.
//!
//! The catalog is managed out of band; these endpoints exist for the admin
//! dashboard to inspect a product and toggle its coupon eligibility.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use navona_core::ProductId;

use crate::db::{self, products::ProductPatch};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Fetch one product by id.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound("Product".to_owned()))?;

    let product = db::products::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(product))
}

/// Request body for a partial product update. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub is_accept_coupon: Option<bool>,
}

impl UpdateProductRequest {
    fn into_patch(self) -> Result<ProductPatch> {
        let price = self
            .price
            .map(|raw| {
                if raw < 0.0 {
                    return Err(AppError::Validation("price cannot be negative".to_owned()));
                }
                rust_decimal::Decimal::try_from(raw)
                    .map_err(|_| AppError::Validation("price must be a number".to_owned()))
            })
            .transpose()?;

        Ok(ProductPatch {
            name: self.name,
            description: self.description,
            price,
            stock: self.stock,
            category: self.category,
            is_accept_coupon: self.is_accept_coupon,
        })
    }
}

/// Response for a successful product update.
#[derive(Debug, Serialize)]
pub struct UpdateProductResponse {
    pub success: bool,
    pub message: String,
    pub product: Product,
}

/// Partially update a product (admin coupon-eligibility toggle).
#[instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<UpdateProductResponse>> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound("Product".to_owned()))?;
    let patch = body.into_patch()?;

    let product = db::products::update(state.pool(), id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(UpdateProductResponse {
        success: true,
        message: "Product updated successfully".to_owned(),
        product,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_is_rejected() {
        let req = UpdateProductRequest {
            name: None,
            description: None,
            price: Some(-1.0),
            stock: None,
            category: None,
            is_accept_coupon: None,
        };
        assert!(matches!(
            req.into_patch().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_absent_fields_stay_unset() {
        let req = UpdateProductRequest {
            name: None,
            description: None,
            price: None,
            stock: None,
            category: None,
            is_accept_coupon: Some(true),
        };
        let patch = req.into_patch().expect("valid patch");
        assert!(patch.name.is_none());
        assert!(patch.price.is_none());
        assert_eq!(patch.is_accept_coupon, Some(true));
    }
}
