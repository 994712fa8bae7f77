use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::sale::{self, Entity as Sale};
use crate::errors::ServiceError;

const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Optional criteria narrowing which sales a query considers.
///
/// Absent fields impose no constraint on their dimension; present fields
/// combine conjunctively. Date bounds are inclusive; the product name match
/// is exact and case-sensitive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub product_name: Option<String>,
}

impl SaleFilter {
    /// Applies the present criteria to a query. Pure: no side effects,
    /// same input always produces the same predicate.
    fn apply(&self, mut query: Select<Sale>) -> Select<Sale> {
        if let Some(start) = self.start_date {
            query = query.filter(sale::Column::SaleDate.gte(start));
        }
        if let Some(end) = self.end_date {
            query = query.filter(sale::Column::SaleDate.lte(end));
        }
        if let Some(ref name) = self.product_name {
            query = query.filter(sale::Column::ProductName.eq(name.as_str()));
        }
        query
    }
}

/// Fields required to record a new sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub sale_date: NaiveDate,
}

/// Partial update: only present fields are applied; absent fields keep
/// their prior value.
#[derive(Debug, Clone, Default)]
pub struct SaleChanges {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub sale_date: Option<NaiveDate>,
}

/// Service for recording sales and answering aggregate questions over them
#[derive(Clone)]
pub struct SalesService {
    db_pool: Arc<DbPool>,
}

impl SalesService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a new sale. Timestamps are server-assigned; `created_at`
    /// and `updated_at` start out equal.
    #[instrument(skip(self))]
    pub async fn create_sale(&self, input: NewSale) -> Result<sale::Model, ServiceError> {
        validate_product_name(&input.product_name)?;
        validate_quantity(input.quantity)?;
        let price = validate_price(input.price)?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let model = sale::ActiveModel {
            id: Default::default(),
            product_name: Set(input.product_name),
            quantity: Set(input.quantity),
            price: Set(price),
            sale_date: Set(input.sale_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        Ok(created)
    }

    /// Lists sales matching the filter, newest first: `sale_date`
    /// descending, ties broken by `id` descending.
    #[instrument(skip(self))]
    pub async fn list_sales(&self, filter: &SaleFilter) -> Result<Vec<sale::Model>, ServiceError> {
        let db = &*self.db_pool;
        let sales = filter
            .apply(Sale::find())
            .order_by_desc(sale::Column::SaleDate)
            .order_by_desc(sale::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(sales)
    }

    /// Gets a sale by id; `None` is the not-found signal.
    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: i64) -> Result<Option<sale::Model>, ServiceError> {
        let db = &*self.db_pool;
        let sale = Sale::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(sale)
    }

    /// Applies a partial update to an existing sale.
    ///
    /// `updated_at` is refreshed whenever the row exists, even for an empty
    /// change set. Returns `None` when no sale has the given id.
    #[instrument(skip(self))]
    pub async fn update_sale(
        &self,
        id: i64,
        changes: SaleChanges,
    ) -> Result<Option<sale::Model>, ServiceError> {
        let db = &*self.db_pool;
        let Some(existing) = Sale::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
        else {
            return Ok(None);
        };

        if let Some(ref name) = changes.product_name {
            validate_product_name(name)?;
        }
        if let Some(quantity) = changes.quantity {
            validate_quantity(quantity)?;
        }
        let price = changes.price.map(validate_price).transpose()?;

        let mut active: sale::ActiveModel = existing.into();
        if let Some(name) = changes.product_name {
            active.product_name = Set(name);
        }
        if let Some(quantity) = changes.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(price) = price {
            active.price = Set(price);
        }
        if let Some(sale_date) = changes.sale_date {
            active.sale_date = Set(sale_date);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(ServiceError::DatabaseError)?;

        Ok(Some(updated))
    }

    /// Hard-deletes a sale by id; returns whether a row was removed.
    #[instrument(skip(self))]
    pub async fn delete_sale(&self, id: i64) -> Result<bool, ServiceError> {
        let db = &*self.db_pool;
        let result = Sale::delete_by_id(id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(result.rows_affected > 0)
    }

    /// Total revenue (sum of `quantity * price`) over matching sales,
    /// at currency precision. Exactly `0.00` when nothing matches.
    ///
    /// The fold runs in `Decimal` end to end: only the quantity and price
    /// columns are fetched, and no binary floating-point intermediate is
    /// involved, so repeated cents sum without drift.
    #[instrument(skip(self))]
    pub async fn total_revenue(&self, filter: &SaleFilter) -> Result<Decimal, ServiceError> {
        let db = &*self.db_pool;
        let rows: Vec<(i32, Decimal)> = filter
            .apply(Sale::find())
            .select_only()
            .column(sale::Column::Quantity)
            .column(sale::Column::Price)
            .into_tuple()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut total: Decimal = rows
            .iter()
            .map(|(quantity, price)| Decimal::from(*quantity) * *price)
            .sum();
        total.rescale(2);

        Ok(total)
    }

    /// Total items sold (sum of quantities) over matching sales. Exactly
    /// `0` when nothing matches. The summation is pushed to the storage
    /// layer; integer arithmetic is exact on every backend.
    #[instrument(skip(self))]
    pub async fn total_items_sold(&self, filter: &SaleFilter) -> Result<i64, ServiceError> {
        let db = &*self.db_pool;
        let total: Option<i64> = filter
            .apply(Sale::find())
            .select_only()
            .column_as(sale::Column::Quantity.sum(), "total_items")
            .into_tuple::<Option<i64>>()
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .flatten();

        Ok(total.unwrap_or(0))
    }
}

fn validate_product_name(name: &str) -> Result<(), ServiceError> {
    if name.is_empty() {
        return Err(ServiceError::ValidationError(
            "product_name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ServiceError::ValidationError(format!(
            "product_name must be at most {} characters",
            MAX_PRODUCT_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> Result<(), ServiceError> {
    if quantity <= 0 {
        return Err(ServiceError::ValidationError(
            "quantity must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates a currency amount and normalizes it to 2 fractional digits.
fn validate_price(price: Decimal) -> Result<Decimal, ServiceError> {
    if price.is_sign_negative() {
        return Err(ServiceError::ValidationError(
            "price must be greater than or equal to 0".to_string(),
        ));
    }
    if price.normalize().scale() > 2 {
        return Err(ServiceError::ValidationError(
            "price must have at most 2 decimal places".to_string(),
        ));
    }
    let mut price = price;
    price.rescale(2);
    Ok(price)
}
