//! Typed access to the hosted relational store
//!
//! [`StoreClient`] speaks the store's REST dialect for a single table;
//! [`FarmStore`] layers the domain's typed accessors on top of it.

mod gateway;
mod models;
mod query;

use reqwest::Client;
use serde::Serialize;

pub use gateway::*;
pub use models::*;
pub use query::*;

/// Client for row operations on a single table
pub struct StoreClient {
    /// The base URL for the backing store
    url: String,

    /// The public API key for the backing store
    key: String,

    /// The database schema queries run against
    schema: String,

    /// The table or view name
    table: String,

    /// HTTP client
    client: Client,
}

impl StoreClient {
    /// Create a new StoreClient
    pub(crate) fn new(url: &str, key: &str, schema: &str, table: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            schema: schema.to_string(),
            table: table.to_string(),
            client,
        }
    }

    /// Get the base URL for REST API requests
    fn get_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }

    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(
            self.get_url(),
            self.key.clone(),
            self.schema.clone(),
            columns,
            self.client.clone(),
        )
    }

    /// Insert rows into the table
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(
            self.get_url(),
            self.key.clone(),
            self.schema.clone(),
            values,
            self.client.clone(),
        )
    }

    /// Update rows in the table
    pub fn update<T: Serialize>(&self, values: T) -> UpdateBuilder<T> {
        UpdateBuilder::new(
            self.get_url(),
            self.key.clone(),
            self.schema.clone(),
            values,
            self.client.clone(),
        )
    }

    /// Delete rows from the table
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(
            self.get_url(),
            self.key.clone(),
            self.schema.clone(),
            self.client.clone(),
        )
    }
}
