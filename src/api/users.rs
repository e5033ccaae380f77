use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

use crate::{
    models::{CreateUserRequest, UpdateUserRequest, UserResponse},
    services::UserStore,
    utils::{AppError, StoreError},
};

/// Logs the failure and collapses it into the single client-facing error.
fn store_failure(operation: &'static str) -> impl Fn(StoreError) -> AppError {
    move |e| {
        log::error!("❌ Failed to {}: {}", operation, e);
        AppError::from(e)
    }
}

/// Malformed or incomplete bodies are reported like any other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        log::error!("❌ Invalid body for {} {}: {}", req.method(), req.path(), err);
        AppError::StoreOperationFailed(err.to_string()).into()
    })
}

/// An absent or blank `PUT` body is an empty change set; anything else must
/// be a valid JSON object.
fn parse_changes(body: &[u8]) -> Result<UpdateUserRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateUserRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        log::error!("❌ Invalid update body: {}", e);
        AppError::StoreOperationFailed(format!("Json deserialize error: {}", e))
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn list_users(store: web::Data<dyn UserStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /users");

    let users = store.find_all().await.map_err(store_failure("list users"))?;

    log::info!("✅ Found {} users", users.len());
    Ok(HttpResponse::Ok().json(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    responses(
        (status = 200, description = "The user, or null when no user has this id", body = UserResponse),
        (status = 500, description = "Malformed id or store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn get_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🔍 GET /users/{}", id);

    let user = store.find_by_id(&id).await.map_err(store_failure("fetch user"))?;

    Ok(HttpResponse::Ok().json(user.map(UserResponse::from)))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 500, description = "Invalid body, duplicate email or store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn create_user(
    store: web::Data<dyn UserStore>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /users - email: {}", body.email);

    let user = store
        .create(body.into_inner())
        .await
        .map_err(store_failure("create user"))?;

    log::info!("✅ User created: {}", user.email);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "The user after the update, or null when no user has this id", body = UserResponse),
        (status = 500, description = "Malformed id, invalid body or store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("✏️  PUT /users/{}", id);

    let changes = parse_changes(&body)?;

    let user = store
        .update_by_id(&id, changes)
        .await
        .map_err(store_failure("update user"))?;

    Ok(HttpResponse::Ok().json(user.map(UserResponse::from)))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    responses(
        (status = 200, description = "The user as it was before removal, or null when no user has this id", body = UserResponse),
        (status = 500, description = "Malformed id or store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🗑️  DELETE /users/{}", id);

    let user = store
        .delete_by_id(&id)
        .await
        .map_err(store_failure("delete user"))?;

    Ok(HttpResponse::Ok().json(user.map(UserResponse::from)))
}
