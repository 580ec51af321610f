//! Proxy for the `/Configuration` endpoints.

use crate::client::error::ClientResult;
use crate::client::http::{ApiClient, ApiResponse};
use crate::client::types::Configuration;

/// Typed access to configuration records.
#[derive(Debug, Clone)]
pub struct ConfigurationService {
    api: ApiClient,
}

impl ConfigurationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /Configuration/GetAll`
    pub async fn get_all(&self) -> ClientResult<ApiResponse<Vec<Configuration>>> {
        let url = self.api.url(&["Configuration", "GetAll"])?;
        self.api.send("Configuration/GetAll", self.api.get(url)).await
    }

    /// `GET /Configuration/GetById/{id}`
    pub async fn get_by_id(&self, id: i32) -> ClientResult<ApiResponse<Configuration>> {
        let id = id.to_string();
        let url = self.api.url(&["Configuration", "GetById", &id])?;
        self.api.send("Configuration/GetById", self.api.get(url)).await
    }

    /// `GET /Configuration/GetByApplicationName/{name}`
    pub async fn get_by_application_name(
        &self,
        application_name: &str,
    ) -> ClientResult<ApiResponse<Vec<Configuration>>> {
        let url = self
            .api
            .url(&["Configuration", "GetByApplicationName", application_name])?;
        self.api
            .send("Configuration/GetByApplicationName", self.api.get(url))
            .await
    }

    /// `POST /Configuration/Insert`, returning the new identifier.
    pub async fn insert(&self, configuration: &Configuration) -> ClientResult<ApiResponse<i32>> {
        let url = self.api.url(&["Configuration", "Insert"])?;
        self.api
            .send("Configuration/Insert", self.api.post(url).json(configuration))
            .await
    }

    /// `PUT /Configuration/Update`, returning the affected row count.
    pub async fn update(&self, configuration: &Configuration) -> ClientResult<ApiResponse<i32>> {
        let url = self.api.url(&["Configuration", "Update"])?;
        self.api
            .send("Configuration/Update", self.api.put(url).json(configuration))
            .await
    }

    /// `DELETE /Configuration/Delete/{id}`, returning the affected row count.
    pub async fn delete(&self, id: i32) -> ClientResult<ApiResponse<i32>> {
        let id = id.to_string();
        let url = self.api.url(&["Configuration", "Delete", &id])?;
        self.api.send("Configuration/Delete", self.api.delete(url)).await
    }
}
