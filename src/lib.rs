//! Sales Insights API Library
//!
//! This crate provides the core functionality for the Sales Insights API:
//! recording sales transactions and answering aggregate questions over them
//! (total revenue, total items sold) with optional date-range and
//! product-name filters.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub sales: services::sales::SalesService,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let sales = services::sales::SalesService::new(db.clone());
        Self { db, config, sales }
    }
}

/// All versioned API routes, to be nested under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new().nest("/sales", handlers::sales::sales_routes())
}
