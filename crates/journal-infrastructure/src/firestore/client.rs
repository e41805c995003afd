//! Firestore REST client.

use async_trait::async_trait;
use journal_core::config::RemoteStoreConfig;
use journal_core::error::{JournalError, Result};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value::{from_typed_fields, to_typed_fields};
use super::{Document, DocumentStore};

const BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// [`DocumentStore`] backed by the Firestore REST API, authenticated with a web API key.
#[derive(Clone)]
pub struct FirestoreDocumentStore {
    client: Client,
    base_url: String,
    project_id: String,
    database: String,
    api_key: String,
}

impl FirestoreDocumentStore {
    pub fn new(
        project_id: impl Into<String>,
        database: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
            project_id: project_id.into(),
            database: database.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &RemoteStoreConfig) -> Self {
        Self::new(&config.project_id, &config.database, &config.api_key)
    }

    /// Points the client at another endpoint (emulator).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `.../projects/{project}/databases/{database}/documents` followed by `segments`.
    fn documents_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| JournalError::config(format!("Invalid Firestore URL: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| JournalError::config("Firestore URL cannot be a base"))?;
            path.pop_if_empty().extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database.as_str(),
            ]);
            path.extend(segments);
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn run_query_url(&self) -> Result<Url> {
        self.documents_url(&["documents:runQuery"])
    }

    fn document_url(&self, collection: &str, id: &str) -> Result<Url> {
        self.documents_url(&["documents", collection, id])
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn list_documents(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>> {
        let body = RunQueryRequest::collection(collection, order_by);
        let response = self
            .client
            .post(self.run_query_url()?)
            .json(&body)
            .send()
            .await
            .map_err(|err| JournalError::data_access(format!("Firestore request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Firestore error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let rows: Vec<RunQueryResponse> = response.json().await.map_err(|err| {
            JournalError::data_access(format!("Failed to parse Firestore response: {err}"))
        })?;

        Ok(decode_rows(rows))
    }

    async fn upsert_document(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let body = DocumentBody {
            fields: to_typed_fields(data),
        };
        let response = self
            .client
            .patch(self.document_url(collection, id)?)
            .json(&body)
            .send()
            .await
            .map_err(|err| JournalError::data_access(format!("Firestore request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Firestore error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest {
    structured_query: StructuredQuery,
}

impl RunQueryRequest {
    fn collection(collection: &str, order_by: Option<&str>) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                order_by: order_by
                    .map(|field| {
                        vec![Order {
                            field: FieldReference {
                                field_path: field.to_string(),
                            },
                            direction: "ASCENDING",
                        }]
                    })
                    .unwrap_or_default(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<Order>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Serialize)]
struct Order {
    field: FieldReference,
    direction: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

#[derive(Serialize)]
struct DocumentBody {
    fields: Map<String, Value>,
}

/// One element of the `runQuery` response stream.
///
/// Rows without `document` only carry read metadata.
#[derive(Deserialize)]
struct RunQueryResponse {
    document: Option<DocumentResponse>,
}

#[derive(Deserialize)]
struct DocumentResponse {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

fn decode_rows(rows: Vec<RunQueryResponse>) -> Vec<Document> {
    rows.into_iter()
        .filter_map(|row| row.document)
        .filter_map(|doc| {
            let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
            match from_typed_fields(&doc.fields) {
                Ok(data) => Some(Document { id, data }),
                Err(e) => {
                    tracing::warn!("[Firestore] Skipping undecodable document {}: {}", doc.name, e);
                    None
                }
            }
        })
        .collect()
}

fn map_http_error(status: StatusCode, body: String) -> JournalError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    JournalError::data_access(format!("Firestore returned {}: {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> FirestoreDocumentStore {
        FirestoreDocumentStore::new("my-journal", "(default)", "secret-key")
    }

    #[test]
    fn test_document_url_escapes_ids() {
        let url = store().document_url("diary_entries", "2024-03-10").unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/my-journal/databases/(default)/documents/diary_entries/2024-03-10?key=secret-key"
        );

        let url = store().document_url("chat_history", "a/b c").unwrap();
        assert!(url.path().ends_with("/chat_history/a%2Fb%20c"));
    }

    #[test]
    fn test_run_query_url() {
        let url = store().run_query_url().unwrap();
        assert!(url.path().ends_with("/databases/(default)/documents:runQuery"));
    }

    #[test]
    fn test_base_url_override() {
        let url = store()
            .with_base_url("http://localhost:8080/v1/")
            .run_query_url()
            .unwrap();
        assert!(url.as_str().starts_with("http://localhost:8080/v1/projects/my-journal/"));
    }

    #[test]
    fn test_run_query_body() {
        let body = serde_json::to_value(RunQueryRequest::collection("chat_history", Some("timestamp")))
            .unwrap();
        assert_eq!(
            body,
            json!({"structuredQuery": {
                "from": [{"collectionId": "chat_history"}],
                "orderBy": [{"field": {"fieldPath": "timestamp"}, "direction": "ASCENDING"}]
            }})
        );

        let body = serde_json::to_value(RunQueryRequest::collection("diary_entries", None)).unwrap();
        assert!(body["structuredQuery"].get("orderBy").is_none());
    }

    #[test]
    fn test_decode_rows_skips_metadata_and_bad_documents() {
        let rows: Vec<RunQueryResponse> = serde_json::from_value(json!([
            {"readTime": "2024-03-10T00:00:00Z"},
            {"document": {
                "name": "projects/p/databases/(default)/documents/diary_entries/2024-03-10",
                "fields": {"content": {"stringValue": "hi"}}
            }},
            {"document": {
                "name": "projects/p/databases/(default)/documents/diary_entries/bad",
                "fields": {"content": {"integerValue": "nope"}}
            }}
        ]))
        .unwrap();

        let docs = decode_rows(rows);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "2024-03-10");
        assert_eq!(docs[0].data["content"], "hi");
    }

    #[test]
    fn test_map_http_error_uses_envelope() {
        let err = map_http_error(
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":403,"message":"Missing permissions","status":"PERMISSION_DENIED"}}"#
                .to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Data access error: Firestore returned 403: PERMISSION_DENIED: Missing permissions"
        );
    }
}
