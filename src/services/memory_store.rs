use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::{
    models::{CreateUserRequest, UpdateUserRequest, User},
    services::user_service::{parse_id, UserStore},
    utils::StoreError,
};

/// Process-local store with the same id and uniqueness rules as the
/// MongoDB collection. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &[User], email: &str, except: Option<ObjectId>) -> bool {
    users
        .iter()
        .any(|u| u.email == email && u.id != except)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let object_id = parse_id(id)?;
        let users = self.users.read().await;

        Ok(users.iter().find(|u| u.id == Some(object_id)).cloned())
    }

    async fn create(&self, new_user: CreateUserRequest) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if email_taken(&users, &new_user.email, None) {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }

        let mut user = User::from(new_user);
        user.id = Some(ObjectId::new());
        users.push(user.clone());

        Ok(user)
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: UpdateUserRequest,
    ) -> Result<Option<User>, StoreError> {
        let object_id = parse_id(id)?;
        let mut users = self.users.write().await;

        let Some(index) = users.iter().position(|u| u.id == Some(object_id)) else {
            return Ok(None);
        };

        if let Some(email) = &changes.email {
            if email_taken(&users, email, Some(object_id)) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        let user = &mut users[index];
        changes.apply_to(user);

        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let object_id = parse_id(id)?;
        let mut users = self.users.write().await;

        Ok(users
            .iter()
            .position(|u| u.id == Some(object_id))
            .map(|index| users.remove(index)))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            email: "ana@x.com".into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_an_id_and_keeps_fields() {
        let store = MemoryUserStore::new();

        let user = store.create(ana()).await.unwrap();

        assert!(user.id.is_some());
        assert_eq!(user.first_name, "Ana");
        assert_eq!(user.email, "ana@x.com");
        assert_eq!(store.find_all().await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = MemoryUserStore::new();
        store.create(ana()).await.unwrap();
        store
            .create(CreateUserRequest {
                email: "bia@x.com".into(),
                first_name: "Bia".into(),
                ..ana()
            })
            .await
            .unwrap();

        let names: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.first_name)
            .collect();
        assert_eq!(names, vec!["Ana", "Bia"]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.create(ana()).await.unwrap();

        let err = store.create(ana()).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn update_cannot_steal_another_users_email() {
        let store = MemoryUserStore::new();
        store.create(ana()).await.unwrap();
        let bia = store
            .create(CreateUserRequest { email: "bia@x.com".into(), ..ana() })
            .await
            .unwrap();

        let err = store
            .update_by_id(
                &bia.id.unwrap().to_hex(),
                UpdateUserRequest { email: Some("ana@x.com".into()), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn update_keeping_own_email_is_allowed() {
        let store = MemoryUserStore::new();
        let user = store.create(ana()).await.unwrap();

        let updated = store
            .update_by_id(
                &user.id.unwrap().to_hex(),
                UpdateUserRequest { email: Some("ana@x.com".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated, Some(user));
    }

    #[tokio::test]
    async fn unknown_ids_resolve_to_none() {
        let store = MemoryUserStore::new();
        let id = ObjectId::new().to_hex();

        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store
            .update_by_id(&id, UpdateUserRequest::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_ids_fail() {
        let store = MemoryUserStore::new();

        assert!(matches!(
            store.find_by_id("42").await,
            Err(StoreError::InvalidId(_))
        ));
        assert!(matches!(
            store.delete_by_id("42").await,
            Err(StoreError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn delete_returns_the_removed_user() {
        let store = MemoryUserStore::new();
        let user = store.create(ana()).await.unwrap();
        let id = user.id.unwrap().to_hex();

        assert_eq!(store.delete_by_id(&id).await.unwrap(), Some(user));
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
