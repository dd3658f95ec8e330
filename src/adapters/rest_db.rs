use crate::adapters::http::{build_client, ensure_success, join_url};
use crate::domain::ports::{Database, Filter};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

const SERVICE: &str = "database";

/// PostgREST client for the hosted database.
#[derive(Debug, Clone)]
pub struct RestDatabase {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestDatabase {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        join_url(&self.base_url, &format!("rest/v1/{}", table))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn query_pairs(filters: &[Filter]) -> Vec<(String, String)> {
        filters.iter().map(Filter::to_query_pair).collect()
    }
}

fn first_row(rows: Vec<Value>, table: &str) -> Result<Value> {
    rows.into_iter().next().ok_or_else(|| AppError::ProcessingError {
        message: format!("insert into {} returned no row", table),
    })
}

#[async_trait]
impl Database for RestDatabase {
    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(Self::query_pairs(filters));

        tracing::debug!("SELECT {} {:?}", table, query);
        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(&query)
            .send()
            .await?;
        let rows = ensure_success(SERVICE, response).await?.json().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        tracing::debug!("INSERT {}", table);
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let rows: Vec<Value> = ensure_success(SERVICE, response).await?.json().await?;
        first_row(rows, table)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> Result<Vec<Value>> {
        // PostgREST would patch the whole table without a filter
        if filters.is_empty() {
            return Err(AppError::ProcessingError {
                message: format!("refusing unfiltered update on {}", table),
            });
        }

        tracing::debug!("UPDATE {} {:?}", table, filters);
        let response = self
            .authorized(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&Self::query_pairs(filters))
            .json(&patch)
            .send()
            .await?;
        let rows = ensure_success(SERVICE, response).await?.json().await?;
        Ok(rows)
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value> {
        tracing::debug!("RPC {}", function);
        let response = self
            .authorized(
                self.client
                    .post(join_url(&self.base_url, &format!("rest/v1/rpc/{}", function))),
            )
            .json(&args)
            .send()
            .await?;
        let result = ensure_success(SERVICE, response).await?.json().await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;

    #[tokio::test]
    async fn test_select_sends_filters_and_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/providers")
                .query_param("select", "*")
                .query_param("id", "eq.prov-1")
                .header("apikey", "anon-key")
                .header("authorization", "Bearer anon-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"id": "prov-1", "status": "pending"}]));
        });

        let db = RestDatabase::new(&server.base_url(), "anon-key").unwrap();
        let rows = db
            .select("providers", &[Filter::eq("id", "prov-1")])
            .await
            .unwrap();

        mock.assert();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "pending");
    }

    #[tokio::test]
    async fn test_insert_returns_representation() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/reviews")
                .header("prefer", "return=representation")
                .json_body(json!({"rating": 5}));
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(json!([{"id": "rev-1", "rating": 5}]));
        });

        let db = RestDatabase::new(&server.base_url(), "key").unwrap();
        let row = db.insert("reviews", json!({"rating": 5})).await.unwrap();

        mock.assert();
        assert_eq!(row["id"], "rev-1");
    }

    #[tokio::test]
    async fn test_update_uses_patch_with_filters() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/invoices")
                .query_param("id", "eq.inv-1")
                .json_body(json!({"status": "paid"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"id": "inv-1", "status": "paid"}]));
        });

        let db = RestDatabase::new(&server.base_url(), "key").unwrap();
        let rows = db
            .update("invoices", &[Filter::eq("id", "inv-1")], json!({"status": "paid"}))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_unfiltered_update_is_refused() {
        let db = RestDatabase::new("http://127.0.0.1:9", "key").unwrap();
        let result = db.update("invoices", &[], json!({"status": "paid"})).await;
        assert!(matches!(result, Err(AppError::ProcessingError { .. })));
    }

    #[tokio::test]
    async fn test_rpc_and_upstream_errors() {
        let server = MockServer::start();
        let ok = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/rpc/analyze_binome_performance")
                .json_body(json!({"p_binome_id": "bin-1"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"score": 92}));
        });
        let failing = server.mock(|when, then| {
            when.method(POST).path("/rest/v1/rpc/dissolve_binome");
            then.status(400).body("binome already dissolved");
        });

        let db = RestDatabase::new(&server.base_url(), "key").unwrap();
        let result = db
            .rpc("analyze_binome_performance", json!({"p_binome_id": "bin-1"}))
            .await
            .unwrap();
        assert_eq!(result["score"], 92);

        let err = db
            .rpc("dissolve_binome", json!({"p_binome_id": "bin-1"}))
            .await
            .unwrap_err();
        match err {
            AppError::UpstreamError { status, body, .. } => {
                assert_eq!(status, 400);
                assert_eq!(body, "binome already dissolved");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        ok.assert();
        failing.assert();
    }
}
