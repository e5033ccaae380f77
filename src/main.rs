mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{
    middleware::{Compress, Logger, NormalizePath},
    web, App, HttpServer,
};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, StoreBackend};
use crate::services::{MemoryUserStore, MongoUserStore, UserStore};

/// Any origin may call the API.
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600)
}

async fn build_store(config: &Config) -> std::io::Result<Arc<dyn UserStore>> {
    match config.store {
        StoreBackend::MongoDb => {
            log::info!("📊 Database: {}", config.database_url);

            let db = database::MongoDB::new(&config.database_url)
                .await
                .map_err(|e| {
                    log::error!("❌ Failed to connect to MongoDB: {}", e);
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
                })?;

            log::info!("✅ MongoDB connected successfully (database: {})", db.database().name());
            Ok(Arc::new(MongoUserStore::new(db)))
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory user store, data is lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Users Gateway...");
    log::info!("🗄️  User store: {}", config.store);

    let store: web::Data<dyn UserStore> = web::Data::from(build_store(&config).await?);

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    let openapi = api::swagger::ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(cors())
            .wrap(Compress::default())
            .wrap(Logger::default())
            // "/users/" and "/users/{id}/" route like their unslashed forms
            .wrap(NormalizePath::trim())
            // Outermost, so it sees every request first
            .wrap(middleware::RequestLogger)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            .configure(api::configure)
    })
    .bind(config.bind_address())?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    #[actix_rt::test]
    async fn cors_allows_any_origin() {
        let store: web::Data<dyn UserStore> =
            web::Data::from(Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>);
        let app = test::init_service(
            App::new()
                .app_data(store)
                .wrap(cors())
                .wrap(middleware::RequestLogger)
                .configure(api::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(("Origin", "http://some-other-site.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .contains_key(actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_rt::test]
    async fn trailing_slashes_are_ignored() {
        let store: web::Data<dyn UserStore> =
            web::Data::from(Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>);
        let app = test::init_service(
            App::new()
                .app_data(store)
                .wrap(NormalizePath::trim())
                .wrap(middleware::RequestLogger)
                .configure(api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/users/")
            .set_json(serde_json::json!({
                "firstName": "Ana",
                "lastName": "Silva",
                "email": "ana@x.com",
                "password": "pw"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: serde_json::Value = test::read_body_json(resp).await;

        let req = test::TestRequest::get().uri("/users/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let uri = format!("/users/{}/", created["id"].as_str().unwrap());
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(fetched, created);
    }

    #[actix_rt::test]
    async fn health_and_metrics_are_served() {
        let store: web::Data<dyn UserStore> =
            web::Data::from(Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>);
        let app = test::init_service(
            App::new()
                .app_data(store)
                .wrap(middleware::RequestLogger)
                .configure(api::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], env!("CARGO_PKG_NAME"));

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let text = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&text).contains("http_requests_total"));
    }
}
