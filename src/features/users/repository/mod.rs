mod postgres;
mod reference;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::users::models::{User, UserQuery, UserRole};

#[async_trait]
pub trait AbstractUsers: Sync + Send {
    /// Insert a new user
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Fetch a user by id
    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Fetch every user whose id is in `ids`, in no particular order
    async fn fetch_users(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// Replace a user's contact details
    async fn update_user_contact(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: &str,
        mobile_number: &str,
    ) -> Result<Option<User>>;

    /// Page through users, newest first, with the total matching count
    async fn list_users(&self, query: &UserQuery) -> Result<(Vec<User>, i64)>;

    async fn set_user_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>>;

    async fn set_user_suspended(&self, id: Uuid, is_suspended: bool) -> Result<Option<User>>;

    /// Delete a user, returning whether it existed
    async fn delete_user(&self, id: Uuid) -> Result<bool>;

    async fn count_users(&self) -> Result<i64>;
}
