use actix_web::web;

pub mod health;
pub mod metrics;
pub mod swagger;
pub mod users;

/// Registers every route plus the shared JSON body configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(users::json_config())
        .route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        .configure(users::configure);
}
