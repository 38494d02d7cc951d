//! BambooHR employee directory client.

pub mod cache;

pub use cache::DirectoryCache;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::APP_USER_AGENT;

/// Source of the employee list. Seam between the cache and the upstream
/// HTTP client, so tests can substitute a canned directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetch the full employee list. No retries; a failure surfaces to the
    /// caller and the in-flight call is aborted if the caller goes away.
    async fn employees(&self) -> Result<Vec<Employee>>;
}

/// One row of the company directory, as served to the frontend.
///
/// Field names follow the BambooHR wire format so the payload round-trips
/// without a mapping layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub photo_uploaded: bool,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub preferred_name: String,
    #[serde(default)]
    pub work_email: String,
}

#[derive(Debug, Deserialize)]
struct EmployeeDirectory {
    #[serde(default)]
    employees: Vec<Employee>,
}

/// Stateless BambooHR API client, authenticated with an API key.
pub struct BambooClient {
    http: reqwest::Client,
    subdomain: String,
    api_key: SecretString,
}

impl BambooClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(subdomain: impl Into<String>, api_key: SecretString) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Error creating reqwest client")?;

        Ok(Self {
            http,
            subdomain: subdomain.into(),
            api_key,
        })
    }

    async fn request<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!(
            "https://api.bamboohr.com/api/gateway.php/{}/v1/{path}",
            self.subdomain
        );

        let response = self
            .http
            .get(&url)
            // BambooHR basic auth: the API key is the username, password is
            // a throwaway.
            .basic_auth(self.api_key.expose_secret(), Some("x"))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("{url}: request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{url}: {status}: {body}"));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("{url}: unparsable response body"))
    }
}

#[async_trait]
impl Directory for BambooClient {
    async fn employees(&self) -> Result<Vec<Employee>> {
        let directory: EmployeeDirectory = self.request("employees/directory").await?;
        Ok(directory.employees)
    }
}
