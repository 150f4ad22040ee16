use crate::core::{ConfigProvider, ContaminantId, FilterSource, WaterFilter};
use crate::domain::model::{filters_from_rows, CONTAMINANTS_FIELD};
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "water_filters";
pub const DEFAULT_COLUMN: &str = CONTAMINANTS_FIELD;

/// Reads filter rows from a PostgREST endpoint (`/rest/v1/<table>`).
#[derive(Debug, Clone)]
pub struct RestFilterSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    table: String,
    column: String,
}

impl RestFilterSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            column: DEFAULT_COLUMN.to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = config.base_url().map(str::to_string);
        let base_url = validate_required_field("base_url", &base_url)?.clone();

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let mut source = Self::new(base_url)
            .with_table(config.table())
            .with_column(config.column())
            .with_client(client);
        if let Some(key) = config.api_key() {
            source = source.with_api_key(key);
        }
        Ok(source)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl FilterSource for RestFilterSource {
    async fn select_containing(&self, contaminant: ContaminantId) -> Result<Vec<WaterFilter>> {
        let url = self.table_url();
        let filter = format!("cs.{}", contaminant.as_array_literal());

        tracing::debug!("GET {} ({}={})", url, self.column, filter);

        let mut request = self
            .client
            .get(&url)
            .query(&[("select", "*"), (self.column.as_str(), filter.as_str())])
            .header("Accept", "application/json");

        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Backend response status: {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LookupError::AuthError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(LookupError::ApiStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&body)
            .map_err(|e| LookupError::ResponseParseError {
                message: e.to_string(),
            })?;
        let filters =
            filters_from_rows(rows, &self.column).map_err(|e| LookupError::ResponseParseError {
                message: e.to_string(),
            })?;

        tracing::debug!("Backend returned {} rows", filters.len());
        Ok(filters)
    }

    fn describe(&self) -> String {
        self.table_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_sends_containment_query_with_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/water_filters")
                .query_param("select", "*")
                .query_param("contaminants_filtered", "cs.{42}")
                .header("apikey", "anon-key")
                .header("Authorization", "Bearer anon-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"id": 1, "contaminants_filtered": [42, 7]}]));
        });

        let source = RestFilterSource::new(server.base_url()).with_api_key("anon-key");
        let filters = source.select_containing(ContaminantId(42)).await.unwrap();

        mock.assert();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].id, json!(1));
    }

    #[tokio::test]
    async fn test_custom_table_and_column() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/filters")
                .query_param("removes", "cs.{3}");
            then.status(200).json_body(json!([]));
        });

        let source = RestFilterSource::new(format!("{}/", server.base_url()))
            .with_table("filters")
            .with_column("removes");
        let filters = source.select_containing(ContaminantId(3)).await.unwrap();

        mock.assert();
        assert!(filters.is_empty());
    }

    #[tokio::test]
    async fn test_custom_column_fills_contaminant_list() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/water_filters")
                .query_param("removes", "cs.{3}");
            then.status(200)
                .json_body(json!([{"id": 1, "name": "Jug", "removes": [3, 9]}]));
        });

        let source = RestFilterSource::new(server.base_url()).with_column("removes");
        let filters = source.select_containing(ContaminantId(3)).await.unwrap();

        assert_eq!(filters.len(), 1);
        assert_eq!(
            filters[0].contaminants_filtered,
            vec![ContaminantId(3), ContaminantId(9)]
        );
        assert!(filters[0].filters(ContaminantId(3)));
        assert!(!filters[0].extra.contains_key("removes"));
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let config = crate::config::LookupConfig::default();
        let err = RestFilterSource::from_config(&config).unwrap_err();
        assert!(matches!(err, LookupError::MissingConfigError { .. }));

        let config = crate::config::LookupConfig {
            base_url: Some("https://demo.supabase.co/".to_string()),
            table: "filters".to_string(),
            timeout_seconds: Some(5),
            ..Default::default()
        };
        let source = RestFilterSource::from_config(&config).unwrap();
        assert_eq!(source.table_url(), "https://demo.supabase.co/rest/v1/filters");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/water_filters");
            then.status(401).body("{\"message\":\"Invalid API key\"}");
        });

        let source = RestFilterSource::new(server.base_url());
        let err = source.select_containing(ContaminantId(1)).await.unwrap_err();
        assert!(matches!(err, LookupError::AuthError { status: 401 }));
    }

    #[tokio::test]
    async fn test_server_error_keeps_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/water_filters");
            then.status(400).body("column does not exist");
        });

        let source = RestFilterSource::new(server.base_url());
        match source.select_containing(ContaminantId(1)).await {
            Err(LookupError::ApiStatusError { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "column does not exist");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/water_filters");
            then.status(200).body("<html>maintenance</html>");
        });

        let source = RestFilterSource::new(server.base_url());
        let err = source.select_containing(ContaminantId(1)).await.unwrap_err();
        assert!(matches!(err, LookupError::ResponseParseError { .. }));
    }
}
