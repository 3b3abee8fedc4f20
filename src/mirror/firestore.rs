//! A [TransactionMirror] backed by the Firestore REST API.

use async_trait::async_trait;
use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;

use crate::{
    error::MirrorError,
    mirror::{Identity, TransactionMirror},
    transaction::Transaction,
};

/// The Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Mirrors transactions into a per-user Firestore subcollection,
/// `users/{identity}/transactions/{document}`.
#[derive(Debug, Clone)]
pub struct FirestoreMirror {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    identity: Option<Identity>,
}

impl FirestoreMirror {
    /// Create a mirror for `project_id` writing under `identity`.
    ///
    /// With `identity` set to `None`, every operation is a silent no-op.
    pub fn new(project_id: &str, identity: Option<Identity>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            project_id: project_id.to_owned(),
            api_key: None,
            identity,
        }
    }

    /// Authenticate requests with a web API key.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_owned());
        self
    }

    /// Override the REST endpoint, e.g. to point at the Firestore emulator.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    fn collection_url(&self, identity: &Identity) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/users/{}/transactions",
            self.base_url,
            self.project_id,
            identity.as_str()
        )
    }

    fn document_url(&self, identity: &Identity, remote_id: &str) -> String {
        format!("{}/{}", self.collection_url(identity), remote_id)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        match &self.api_key {
            Some(key) => vec![("key", key.clone())],
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl TransactionMirror for FirestoreMirror {
    async fn mirror_insert(
        &self,
        transaction: &Transaction,
    ) -> Result<Option<String>, MirrorError> {
        let identity = match &self.identity {
            Some(identity) => identity,
            None => return Ok(None),
        };

        let body = document_fields(transaction)?;
        let response = self
            .client
            .post(self.collection_url(identity))
            .query(&self.query())
            .json(&body)
            .send()
            .await
            .map_err(|error| MirrorError::Http(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| MirrorError::Http(error.to_string()))?;

        if !status.is_success() {
            return Err(MirrorError::Api(api_error_message(status.as_u16(), &text)));
        }

        let document: Value = serde_json::from_str(&text)
            .map_err(|error| MirrorError::MissingDocumentName(error.to_string()))?;

        document["name"]
            .as_str()
            .and_then(document_id_from_name)
            .map(|id| Some(id.to_owned()))
            .ok_or_else(|| MirrorError::MissingDocumentName(text))
    }

    async fn mirror_delete(&self, transaction: &Transaction) -> Result<(), MirrorError> {
        let identity = match &self.identity {
            Some(identity) => identity,
            None => return Ok(()),
        };

        let response = self
            .client
            .delete(self.document_url(identity, &transaction.remote_id))
            .query(&self.query())
            .send()
            .await
            .map_err(|error| MirrorError::Http(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MirrorError::Api(api_error_message(status.as_u16(), &text)));
        }

        Ok(())
    }
}

/// Encode a transaction as a Firestore document body.
///
/// The identity and document id live in the document path, so only the row's
/// own fields are written.
fn document_fields(transaction: &Transaction) -> Result<Value, MirrorError> {
    let timestamp = transaction
        .date
        .format(&Rfc3339)
        .map_err(|error| MirrorError::Http(format!("could not format timestamp: {error}")))?;

    Ok(json!({
        "fields": {
            "id": { "integerValue": transaction.id.to_string() },
            "description": { "stringValue": transaction.description },
            "amount": { "doubleValue": transaction.amount },
            "category": { "stringValue": transaction.category.as_str() },
            "date": { "timestampValue": timestamp },
        }
    }))
}

/// Extract the document id from a full resource name such as
/// `projects/p/databases/(default)/documents/users/u/transactions/AbC123`.
fn document_id_from_name(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|id| !id.is_empty())
}

/// Pull the human-readable message out of a Firestore error body, falling
/// back to the raw body.
fn api_error_message(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_owned));

    match message {
        Some(message) => format!("HTTP {status}: {message}"),
        None => format!("HTTP {status}: {body}"),
    }
}
