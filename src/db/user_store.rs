use async_trait::async_trait;
use mongodb::{bson::doc, Collection, Database};

use crate::db::is_duplicate_key;
use crate::models::user_models::User;
use crate::utils::error::{AppError, AppResult};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> AppResult<()>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

pub struct MongoUserStore {
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection::<User>("users"),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert_user(&self, user: &User) -> AppResult<()> {
        self.users.insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::ValidationError("A user with this email already exists.".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }
}
