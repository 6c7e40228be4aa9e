//! Query builders for the store client

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::error::Error;
use crate::fetch::Fetch;

/// Accumulated query-string parameters
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: HashMap<String, String>,
}

impl QueryBuilder {
    /// Create a new QueryBuilder
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Add a parameter to the query
    pub fn add_param(&mut self, key: &str, value: &str) {
        self.params.insert(key.to_string(), value.to_string());
    }

    /// Get the query parameters
    pub fn get_params(&self) -> &HashMap<String, String> {
        &self.params
    }
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    url: String,
    key: String,
    schema: String,
    client: Client,
    query: QueryBuilder,
}

impl SelectBuilder {
    /// Create a new SelectBuilder
    pub(crate) fn new(url: String, key: String, schema: String, columns: &str, client: Client) -> Self {
        let mut query = QueryBuilder::new();
        query.add_param("select", columns);

        Self {
            url,
            key,
            schema,
            client,
            query,
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString>(mut self, column: &str, value: T) -> Self {
        let filter = format!("eq.{}", value.to_string());
        self.query.add_param(column, &filter);
        self
    }

    /// Order the results by a column
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.query
            .add_param("order", &format!("{}.{}", column, direction));
        self
    }

    /// Limit the number of rows returned
    pub fn limit(mut self, count: i32) -> Self {
        self.query.add_param("limit", &count.to_string());
        self
    }

    /// Execute the query and return the results
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let fetch = Fetch::get(&self.client, &self.url)
            .api_key(&self.key)
            .header("Accept-Profile", &self.schema)
            .query(self.query.get_params().clone());

        let result = fetch.execute::<Vec<T>>().await?;
        Ok(result)
    }

    /// Execute the query and return the first row, if any
    pub async fn execute_one<T: DeserializeOwned>(self) -> Result<Option<T>, Error> {
        let results = self.limit(1).execute::<T>().await?;
        Ok(results.into_iter().next())
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    url: String,
    key: String,
    schema: String,
    values: T,
    client: Client,
}

impl<T: Serialize> InsertBuilder<T> {
    /// Create a new InsertBuilder
    pub(crate) fn new(url: String, key: String, schema: String, values: T, client: Client) -> Self {
        Self {
            url,
            key,
            schema,
            values,
            client,
        }
    }

    /// Execute the insert and return the created rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<Vec<R>, Error> {
        let fetch = Fetch::post(&self.client, &self.url)
            .api_key(&self.key)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=representation")
            .json(&self.values)?;

        let result = fetch.execute::<Vec<R>>().await?;
        Ok(result)
    }
}

/// Builder for UPDATE queries.
///
/// Filters compose, so a conditional write (`id` plus an expected current
/// value) is a single PATCH; the returned representation tells the caller
/// whether any row matched.
pub struct UpdateBuilder<T: Serialize> {
    url: String,
    key: String,
    schema: String,
    values: T,
    client: Client,
    query: QueryBuilder,
}

impl<T: Serialize> UpdateBuilder<T> {
    /// Create a new UpdateBuilder
    pub(crate) fn new(url: String, key: String, schema: String, values: T, client: Client) -> Self {
        Self {
            url,
            key,
            schema,
            values,
            client,
            query: QueryBuilder::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(mut self, column: &str, value: V) -> Self {
        let filter = format!("eq.{}", value.to_string());
        self.query.add_param(column, &filter);
        self
    }

    /// Execute the update and return the affected rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<Vec<R>, Error> {
        let fetch = Fetch::patch(&self.client, &self.url)
            .api_key(&self.key)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=representation")
            .query(self.query.get_params().clone())
            .json(&self.values)?;

        let result = fetch.execute::<Vec<R>>().await?;
        Ok(result)
    }

    /// Execute the update without returning the affected rows
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = Fetch::patch(&self.client, &self.url)
            .api_key(&self.key)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=minimal")
            .query(self.query.get_params().clone())
            .json(&self.values)?;

        let response = fetch.execute_raw().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::store(format!(
                "update failed with status {}: {}",
                status, text
            )));
        }
        Ok(())
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    url: String,
    key: String,
    schema: String,
    client: Client,
    query: QueryBuilder,
}

impl DeleteBuilder {
    /// Create a new DeleteBuilder
    pub(crate) fn new(url: String, key: String, schema: String, client: Client) -> Self {
        Self {
            url,
            key,
            schema,
            client,
            query: QueryBuilder::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(mut self, column: &str, value: V) -> Self {
        let filter = format!("eq.{}", value.to_string());
        self.query.add_param(column, &filter);
        self
    }

    /// Execute the delete without returning the deleted rows
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = Fetch::delete(&self.client, &self.url)
            .api_key(&self.key)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=minimal")
            .query(self.query.get_params().clone());

        let response = fetch.execute_raw().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::store(format!(
                "delete failed with status {}: {}",
                status, text
            )));
        }
        Ok(())
    }
}
