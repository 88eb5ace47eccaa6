use serde::{Deserialize, Serialize};

use crate::{ApiClient, Result};

/// Row of the user-management table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Partial update; `None` fields are left unchanged server-side.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub list: Vec<User>,
    #[serde(default)]
    pub total: u64,
}

impl ApiClient {
    /// Lists users, `page` starting at 1.
    pub async fn list_users(&self, page: u32, size: u32) -> Result<UserPage> {
        self.get(&format!("user/list?pageNum={page}&pageSize={size}"))
            .await
    }

    pub async fn get_user(&self, id: u64) -> Result<User> {
        self.get(&format!("user/{id}")).await
    }

    /// Creates a user and returns the stored row.
    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        self.post("user", user).await
    }

    pub async fn update_user(&self, id: u64, update: &UserUpdate) -> Result<User> {
        self.put(&format!("user/{id}"), update).await
    }

    pub async fn delete_user(&self, id: u64) -> Result<()> {
        self.delete(&format!("user/{id}")).await
    }
}
