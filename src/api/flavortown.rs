//! Flavortown REST client.

use super::{build_http_client, decode_response, map_send_error, ResourceListing};
use crate::config::ApiConfig;
use crate::error::{AppError, ClientError};
use crate::models::{
    Project, ProjectFields, ProjectsResponse, ResourceKind, ResourcePage, ShopItem, User,
    UsersResponse,
};
use crate::store::{ConfigStore, SettingKey};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use std::time::Duration;
use tracing::{debug, info};

const EXT_HEADER: &str = "X-Flavortown-Ext-5800";

/// Client for the Flavortown API.
#[derive(Debug, Clone)]
pub struct FlavortownClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl FlavortownClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    /// Build a client from stored credentials.
    ///
    /// Fails with a configuration error when no API key is stored.
    pub fn from_store(store: &dyn ConfigStore, api: &ApiConfig) -> Result<Self, AppError> {
        let api_key = store.require(
            SettingKey::ApiKey,
            "Not logged in. Please run 'flavor login api <api_key>' first.",
        )?;
        Ok(Self::new(&api.flavortown_url, &api_key, api.timeout())?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(EXT_HEADER, "true")
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| map_send_error(e, &self.base_url, self.timeout))
    }

    fn page_params(page: u32, query: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string())];
        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            params.push(("query", q.to_string()));
        }
        params
    }

    /// `GET /api/v1/users`
    pub async fn list_users(
        &self,
        page: u32,
        query: Option<&str>,
    ) -> Result<UsersResponse, ClientError> {
        debug!("Listing users page {} (query: {:?})", page, query);
        let request = self
            .http_client
            .get(self.endpoint("users"))
            .query(&Self::page_params(page, query));
        decode_response(self.send(request).await?, "Users").await
    }

    /// `GET /api/v1/users/{id}`
    pub async fn get_user(&self, id: u64) -> Result<User, ClientError> {
        debug!("Fetching user {}", id);
        let request = self.http_client.get(self.endpoint(&format!("users/{}", id)));
        decode_response(self.send(request).await?, &format!("User with ID {}", id)).await
    }

    /// `GET /api/v1/projects`
    pub async fn list_projects(
        &self,
        page: u32,
        query: Option<&str>,
    ) -> Result<ProjectsResponse, ClientError> {
        debug!("Listing projects page {} (query: {:?})", page, query);
        let request = self
            .http_client
            .get(self.endpoint("projects"))
            .query(&Self::page_params(page, query));
        decode_response(self.send(request).await?, "Projects").await
    }

    /// `GET /api/v1/projects/{id}`
    pub async fn get_project(&self, id: u64) -> Result<Project, ClientError> {
        debug!("Fetching project {}", id);
        let request = self
            .http_client
            .get(self.endpoint(&format!("projects/{}", id)));
        decode_response(self.send(request).await?, &format!("Project with ID {}", id)).await
    }

    /// `POST /api/v1/projects`
    pub async fn create_project(&self, fields: &ProjectFields) -> Result<Project, ClientError> {
        info!("Creating project {:?}", fields.title);
        let request = self.http_client.post(self.endpoint("projects")).json(fields);
        decode_response(self.send(request).await?, "Project").await
    }

    /// `PATCH /api/v1/projects/{id}`, sending only the fields that are set.
    pub async fn update_project(
        &self,
        id: u64,
        fields: &ProjectFields,
    ) -> Result<Project, ClientError> {
        info!("Updating project {}", id);
        let request = self
            .http_client
            .patch(self.endpoint(&format!("projects/{}", id)))
            .json(fields);
        decode_response(self.send(request).await?, &format!("Project with ID {}", id)).await
    }

    /// `GET /api/v1/store`
    pub async fn get_shop(&self) -> Result<Vec<ShopItem>, ClientError> {
        debug!("Fetching shop items");
        let request = self.http_client.get(self.endpoint("store"));
        decode_response(self.send(request).await?, "Shop").await
    }
}

#[async_trait]
impl ResourceListing for FlavortownClient {
    async fn list_resources(
        &self,
        kind: ResourceKind,
        page: u32,
        query: &str,
    ) -> Result<ResourcePage, ClientError> {
        match kind {
            ResourceKind::User => Ok(self.list_users(page, Some(query)).await?.into()),
            ResourceKind::Project => Ok(self.list_projects(page, Some(query)).await?.into()),
        }
    }
}
