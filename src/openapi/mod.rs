use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sales Insights API",
        version = "0.1.0",
        description = "Backend service for managing sales data and generating insights such as total revenue and total items sold."
    ),
    tags(
        (name = "Sales", description = "Sales CRUD and analytics endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::sales::create_sale,
        crate::handlers::sales::list_sales,
        crate::handlers::sales::get_sale,
        crate::handlers::sales::update_sale,
        crate::handlers::sales::delete_sale,
        crate::handlers::sales::get_total_revenue,
        crate::handlers::sales::get_total_items_sold,
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::handlers::sales::CreateSaleRequest,
            crate::handlers::sales::UpdateSaleRequest,
            crate::handlers::sales::SaleResponse,
            crate::handlers::sales::RevenueResponse,
            crate::handlers::sales::ItemsSoldResponse,
            crate::errors::ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
