//! Proxy for the `/Application` endpoints.

use crate::client::error::ClientResult;
use crate::client::http::{ApiClient, ApiResponse};
use crate::client::types::Application;

/// Typed access to application records.
#[derive(Debug, Clone)]
pub struct ApplicationService {
    api: ApiClient,
}

impl ApplicationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /Application/GetAll`
    pub async fn get_all(&self) -> ClientResult<ApiResponse<Vec<Application>>> {
        let url = self.api.url(&["Application", "GetAll"])?;
        self.api.send("Application/GetAll", self.api.get(url)).await
    }

    /// `GET /Application/GetById/{id}`
    pub async fn get_by_id(&self, id: i32) -> ClientResult<ApiResponse<Application>> {
        let id = id.to_string();
        let url = self.api.url(&["Application", "GetById", &id])?;
        self.api.send("Application/GetById", self.api.get(url)).await
    }

    /// `GET /Application/GetByName/{name}`
    pub async fn get_by_name(&self, name: &str) -> ClientResult<ApiResponse<Application>> {
        let url = self.api.url(&["Application", "GetByName", name])?;
        self.api.send("Application/GetByName", self.api.get(url)).await
    }

    /// `POST /Application/Insert`, returning the new identifier.
    pub async fn insert(&self, application: &Application) -> ClientResult<ApiResponse<i32>> {
        let url = self.api.url(&["Application", "Insert"])?;
        self.api
            .send("Application/Insert", self.api.post(url).json(application))
            .await
    }

    /// `PUT /Application/Update`, returning the affected row count.
    pub async fn update(&self, application: &Application) -> ClientResult<ApiResponse<i32>> {
        let url = self.api.url(&["Application", "Update"])?;
        self.api
            .send("Application/Update", self.api.put(url).json(application))
            .await
    }

    /// `DELETE /Application/Delete/{id}`, returning the affected row count.
    pub async fn delete(&self, id: i32) -> ClientResult<ApiResponse<i32>> {
        let id = id.to_string();
        let url = self.api.url(&["Application", "Delete", &id])?;
        self.api.send("Application/Delete", self.api.delete(url)).await
    }
}
