//! HTTP query executor for the data API

use async_trait::async_trait;
use tracing::debug;

use crate::domain::executor::{QueryExecutor, Row};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Executes SQL against a remote data API.
///
/// The API takes the statement as a `sql` query parameter and answers with
/// a JSON array of row objects.
#[derive(Debug)]
pub struct HttpQueryExecutor<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: Option<String>,
}

impl<C: HttpClientTrait> HttpQueryExecutor<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header: None,
        }
    }

    /// Authenticate requests with a bearer token
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.into()));
        self
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        match self.auth_header {
            Some(ref auth) => vec![("Authorization", auth.as_str())],
            None => Vec::new(),
        }
    }
}

fn parse_rows(json: serde_json::Value) -> Result<Vec<Row>, DomainError> {
    let serde_json::Value::Array(items) = json else {
        return Err(DomainError::malformed_response(format!(
            "expected a JSON array of rows, got {}",
            json_type_name(&json)
        )));
    };

    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(row) => Ok(row),
            other => Err(DomainError::malformed_response(format!(
                "expected row objects, got {}",
                json_type_name(&other)
            ))),
        })
        .collect()
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[async_trait]
impl<C: HttpClientTrait> QueryExecutor for HttpQueryExecutor<C> {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, DomainError> {
        let url = self.query_url();

        debug!("Executing SQL against {}", url);

        let response = self
            .client
            .get_json(&url, self.headers(), &[("sql", sql)])
            .await?;

        parse_rows(response)
    }
}
