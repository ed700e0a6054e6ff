use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::database::ReferenceDb;
use crate::core::error::{AppError, Result};
use crate::features::users::models::{User, UserQuery, UserRole};

use super::AbstractUsers;

#[async_trait]
impl AbstractUsers for ReferenceDb {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "Email already in use by another user".to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.get(&id).cloned())
    }

    async fn fetch_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let users = self.users.lock().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn update_user_contact(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: &str,
        mobile_number: &str,
    ) -> Result<Option<User>> {
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.id != id && u.email == email) {
            return Err(AppError::Conflict(
                "Email already in use by another user".to_string(),
            ));
        }

        Ok(users.get_mut(&id).map(|user| {
            if let Some(name) = name {
                user.name = name.to_string();
            }
            user.email = email.to_string();
            user.mobile_number = mobile_number.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn list_users(&self, query: &UserQuery) -> Result<(Vec<User>, i64)> {
        let users = self.users.lock().await;
        let mut matching: Vec<User> = users.values().filter(|u| query.matches(u)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn set_user_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>> {
        let mut users = self.users.lock().await;
        Ok(users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_user_suspended(&self, id: Uuid, is_suspended: bool) -> Result<Option<User>> {
        let mut users = self.users.lock().await;
        Ok(users.get_mut(&id).map(|user| {
            user.is_suspended = is_suspended;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let mut users = self.users.lock().await;
        Ok(users.remove(&id).is_some())
    }

    async fn count_users(&self) -> Result<i64> {
        let users = self.users.lock().await;
        Ok(users.len() as i64)
    }
}
