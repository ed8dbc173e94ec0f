use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

const PAGE_SIZE: u32 = 300;

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("firestore returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// One document as returned by the REST API: a resource name plus a map of
/// typed value wrappers.
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreDocument {
    pub name: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// One page of a collection listing.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<FirestoreDocument>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Connection to one Firestore project, holding the HTTP client and the
/// privileged bearer token.
#[derive(Clone)]
pub struct FirestoreConnection {
    client: Client,
    base_url: String,
    access_token: String,
}

impl FirestoreConnection {
    pub fn new(project_id: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!(
                "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
                project_id
            ),
            access_token: access_token.to_string(),
        }
    }

    /// List one page of documents from a collection.
    pub async fn list_documents(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, FirestoreError> {
        let url = format!("{}/{}", self.base_url, collection);
        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("pageSize", PAGE_SIZE.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirestoreError::Status { status, body });
        }

        Ok(response.json::<ListDocumentsResponse>().await?)
    }
}
