use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    entities::sale,
    errors::ApiError,
    handlers::common::{created_response, map_service_error, no_content_response, validate_input},
    services::sales::{NewSale, SaleChanges, SaleFilter},
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSaleRequest {
    /// Name of the product sold
    #[validate(length(min = 1, max = 255))]
    pub product_name: String,
    /// Number of items sold, must be greater than 0
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Price per item, must be >= 0 with at most 2 decimal places
    #[validate(custom = "validate_price_field")]
    pub price: Decimal,
    /// Date of the sale (YYYY-MM-DD)
    pub sale_date: NaiveDate,
}

/// All fields optional; only provided fields are updated.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSaleRequest {
    #[validate(length(min = 1, max = 255))]
    pub product_name: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(custom = "validate_price_field")]
    pub price: Option<Decimal>,
    pub sale_date: Option<NaiveDate>,
}

/// Query parameters shared by list and analytics endpoints; any subset
/// may be present.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SaleFilterQuery {
    /// Include sales from this date (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Include sales up to this date (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Only sales of this exact product
    pub product_name: Option<String>,
}

impl From<SaleFilterQuery> for SaleFilter {
    fn from(query: SaleFilterQuery) -> Self {
        SaleFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            product_name: query.product_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleResponse {
    pub id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub sale_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<sale::Model> for SaleResponse {
    fn from(model: sale::Model) -> Self {
        Self {
            id: model.id,
            product_name: model.product_name,
            quantity: model.quantity,
            price: model.price,
            sale_date: model.sale_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueResponse {
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemsSoldResponse {
    pub total_items_sold: i64,
}

fn validate_price_field(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price_negative"));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_too_many_decimal_places"));
    }
    Ok(())
}

fn sale_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Sale with id {} not found", id))
}

/// Record a new sale
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded", body = SaleResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .sales
        .create_sale(NewSale {
            product_name: payload.product_name,
            quantity: payload.quantity,
            price: payload.price,
            sale_date: payload.sale_date,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(SaleResponse::from(created)))
}

/// List sales with optional filters, newest first
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(SaleFilterQuery),
    responses(
        (status = 200, description = "Matching sales", body = [SaleResponse])
    ),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<SaleFilterQuery>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    let filter: SaleFilter = query.into();
    let sales = state
        .sales
        .list_sales(&filter)
        .await
        .map_err(map_service_error)?;

    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}

/// Retrieve a sale by id
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale found", body = SaleResponse),
        (status = 404, description = "No such sale", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale = state
        .sales
        .get_sale(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| sale_not_found(id))?;

    Ok(Json(SaleResponse::from(sale)))
}

/// Partially update a sale by id
#[utoipa::path(
    put,
    path = "/api/v1/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    request_body = UpdateSaleRequest,
    responses(
        (status = 200, description = "Sale updated", body = SaleResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "No such sale", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSaleRequest>,
) -> Result<Json<SaleResponse>, ApiError> {
    validate_input(&payload)?;
    let updated = state
        .sales
        .update_sale(
            id,
            SaleChanges {
                product_name: payload.product_name,
                quantity: payload.quantity,
                price: payload.price,
                sale_date: payload.sale_date,
            },
        )
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| sale_not_found(id))?;

    Ok(Json(SaleResponse::from(updated)))
}

/// Delete a sale by id
#[utoipa::path(
    delete,
    path = "/api/v1/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 204, description = "Sale deleted"),
        (status = 404, description = "No such sale", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .sales
        .delete_sale(id)
        .await
        .map_err(map_service_error)?;

    if !deleted {
        return Err(sale_not_found(id));
    }

    Ok(no_content_response())
}

/// Total revenue (sum of quantity * price) over matching sales
#[utoipa::path(
    get,
    path = "/api/v1/sales/analytics/revenue",
    params(SaleFilterQuery),
    responses(
        (status = 200, description = "Total revenue", body = RevenueResponse)
    ),
    tag = "Sales"
)]
pub async fn get_total_revenue(
    State(state): State<AppState>,
    Query(query): Query<SaleFilterQuery>,
) -> Result<Json<RevenueResponse>, ApiError> {
    let filter: SaleFilter = query.into();
    let total_revenue = state
        .sales
        .total_revenue(&filter)
        .await
        .map_err(map_service_error)?;

    Ok(Json(RevenueResponse { total_revenue }))
}

/// Total items sold (sum of quantities) over matching sales
#[utoipa::path(
    get,
    path = "/api/v1/sales/analytics/items-sold",
    params(SaleFilterQuery),
    responses(
        (status = 200, description = "Total items sold", body = ItemsSoldResponse)
    ),
    tag = "Sales"
)]
pub async fn get_total_items_sold(
    State(state): State<AppState>,
    Query(query): Query<SaleFilterQuery>,
) -> Result<Json<ItemsSoldResponse>, ApiError> {
    let filter: SaleFilter = query.into();
    let total_items_sold = state
        .sales
        .total_items_sold(&filter)
        .await
        .map_err(map_service_error)?;

    Ok(Json(ItemsSoldResponse { total_items_sold }))
}

pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sale).get(list_sales))
        .route("/analytics/revenue", get(get_total_revenue))
        .route("/analytics/items-sold", get(get_total_items_sold))
        .route("/:id", get(get_sale).put(update_sale).delete(delete_sale))
}
