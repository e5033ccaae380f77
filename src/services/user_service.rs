use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use crate::{
    database::MongoDB,
    models::{CreateUserRequest, UpdateUserRequest, User},
    utils::StoreError,
};

pub const COLLECTION: &str = "users";

/// CRUD over user documents. Each call either resolves or fails with a
/// descriptive `StoreError`; a missing document is `Ok(None)`, not an error.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn create(&self, new_user: CreateUserRequest) -> Result<User, StoreError>;

    /// Returns the document as it is after the update.
    async fn update_by_id(
        &self,
        id: &str,
        changes: UpdateUserRequest,
    ) -> Result<Option<User>, StoreError>;

    /// Returns the document as it was before removal.
    async fn delete_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[derive(Clone)]
pub struct MongoUserStore {
    db: MongoDB,
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        let users = db.collection::<User>(COLLECTION);
        Self { db, users }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let mut cursor = self.users.find(doc! {}).await?;

        let mut users = Vec::new();
        while let Some(result) = cursor.next().await {
            users.push(result?);
        }

        Ok(users)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let object_id = parse_id(id)?;
        Ok(self.users.find_one(doc! { "_id": object_id }).await?)
    }

    async fn create(&self, new_user: CreateUserRequest) -> Result<User, StoreError> {
        let mut user = User::from(new_user);

        let result = self.users.insert_one(&user).await?;
        let inserted_id = result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::UnexpectedInsertId)?;

        user.id = Some(inserted_id);
        Ok(user)
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: UpdateUserRequest,
    ) -> Result<Option<User>, StoreError> {
        let object_id = parse_id(id)?;

        // "$set" rejects an empty document
        if changes.is_empty() {
            return Ok(self.users.find_one(doc! { "_id": object_id }).await?);
        }

        let updated = self
            .users
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": changes.to_set_document() },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let object_id = parse_id(id)?;
        Ok(self.users.find_one_and_delete(doc! { "_id": object_id }).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(self.db.ping().await?)
    }
}
