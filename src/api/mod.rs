// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod health_records;
pub mod helpers;
pub mod herd;
pub mod production;
pub mod reproduction;
pub mod users;

use std::sync::Arc;

use poem_openapi::OpenApiService;

use crate::app_data::AppData;

pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use health_records::HealthRecordsApi;
pub use herd::HerdApi;
pub use production::ProductionApi;
pub use reproduction::ReproductionApi;
pub use users::UsersApi;

/// Every API served under `/api`
pub type FarmApis = (
    HealthApi,
    AuthApi,
    UsersApi,
    HerdApi,
    ProductionApi,
    HealthRecordsApi,
    ReproductionApi,
);

/// Build the OpenAPI service over all farm endpoints
///
/// `server_url` is advertised in the generated document and used by Swagger UI.
pub fn api_service(app_data: Arc<AppData>, server_url: &str) -> OpenApiService<FarmApis, ()> {
    let apis = (
        HealthApi,
        AuthApi::new(app_data.clone()),
        UsersApi::new(app_data.clone()),
        HerdApi::new(app_data.clone()),
        ProductionApi::new(app_data.clone()),
        HealthRecordsApi::new(app_data.clone()),
        ReproductionApi::new(app_data),
    );

    OpenApiService::new(apis, "Dairy Farm Management API", env!("CARGO_PKG_VERSION")).server(server_url)
}
