use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User document as stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /users`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "Ana")]
    pub first_name: String,
    #[schema(example = "Silva")]
    pub last_name: String,
    #[schema(example = "ana@x.com")]
    pub email: String,
    #[schema(example = "pw")]
    pub password: String,
}

/// Body of `PUT /users/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User as returned by every route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl From<CreateUserRequest> for User {
    fn from(req: CreateUserRequest) -> Self {
        User {
            id: None,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            password: u.password,
        }
    }
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }

    /// `$set` payload holding only the fields present in the request
    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};

        if let Some(first_name) = &self.first_name { set.insert("firstName", first_name); }
        if let Some(last_name) = &self.last_name { set.insert("lastName", last_name); }
        if let Some(email) = &self.email { set.insert("email", email); }
        if let Some(password) = &self.password { set.insert("password", password); }

        set
    }

    /// Merges the present fields into `user`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name { user.first_name = first_name.clone(); }
        if let Some(last_name) = &self.last_name { user.last_name = last_name.clone(); }
        if let Some(email) = &self.email { user.email = email.clone(); }
        if let Some(password) = &self.password { user.password = password.clone(); }
    }
}
