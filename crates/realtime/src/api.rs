//! REST client for the grocery backend.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use indkob_core::grocery::{GroceryEntry, GroceryEntryUpdate, NewGroceryEntry};
use indkob_core::items::{Item, NewItem};
use indkob_core::meal_plan::{MealPlanDay, MealPlanDayUpdate};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{RealtimeError, Result};
use crate::reload::EntriesSource;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: u16,
    message: String,
}

/// Client for the items, grocery entry and meal plan endpoints.
#[derive(Debug, Clone)]
pub struct GroceryApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GroceryApiClient {
    /// `base_url` is the backend origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(RealtimeError::from)
    }

    async fn expect_no_content(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(error_from_body(status.as_u16(), &body))
    }

    // Grocery entries

    /// GET /api/groceryentries
    pub async fn list_entries(&self) -> Result<Vec<GroceryEntry>> {
        let response = self.client.get(self.url("/groceryentries")).send().await?;
        Self::parse_response(response).await
    }

    pub async fn get_entry(&self, entry_id: i64) -> Result<GroceryEntry> {
        let url = self.url(&format!("/groceryentries/{}", entry_id));
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    pub async fn create_entry(&self, new_entry: &NewGroceryEntry) -> Result<GroceryEntry> {
        let response = self
            .client
            .post(self.url("/groceryentries"))
            .json(new_entry)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn update_entry(
        &self,
        entry_id: i64,
        update: &GroceryEntryUpdate,
    ) -> Result<GroceryEntry> {
        let url = self.url(&format!("/groceryentries/{}", entry_id));
        let response = self.client.put(url).json(update).send().await?;
        Self::parse_response(response).await
    }

    pub async fn delete_entry(&self, entry_id: i64) -> Result<()> {
        let url = self.url(&format!("/groceryentries/{}", entry_id));
        let response = self.client.delete(url).send().await?;
        Self::expect_no_content(response).await
    }

    /// DELETE /api/groceryentries
    pub async fn clear_entries(&self) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/groceryentries"))
            .send()
            .await?;
        Self::expect_no_content(response).await
    }

    // Items

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let response = self.client.get(self.url("/items")).send().await?;
        Self::parse_response(response).await
    }

    pub async fn create_item(&self, new_item: &NewItem) -> Result<Item> {
        let response = self
            .client
            .post(self.url("/items"))
            .json(new_item)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn update_item(&self, item_id: i64, changes: &NewItem) -> Result<Item> {
        let url = self.url(&format!("/items/{}", item_id));
        let response = self.client.put(url).json(changes).send().await?;
        Self::parse_response(response).await
    }

    pub async fn delete_item(&self, item_id: i64) -> Result<()> {
        let url = self.url(&format!("/items/{}", item_id));
        let response = self.client.delete(url).send().await?;
        Self::expect_no_content(response).await
    }

    // Meal plan

    /// GET /api/mealplan?weekStart=YYYY-MM-DD
    pub async fn get_meal_plan_week(&self, week_start: NaiveDate) -> Result<Vec<MealPlanDay>> {
        let response = self
            .client
            .get(self.url("/mealplan"))
            .query(&[("weekStart", week_start.format("%Y-%m-%d").to_string())])
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn set_dinner(&self, date: NaiveDate, dinner: Option<String>) -> Result<MealPlanDay> {
        let url = self.url(&format!("/mealplan/{}", date.format("%Y-%m-%d")));
        let response = self
            .client
            .put(url)
            .json(&MealPlanDayUpdate { dinner })
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl EntriesSource for GroceryApiClient {
    async fn fetch_entries(&self) -> Result<Vec<GroceryEntry>> {
        self.list_entries().await
    }
}

fn error_from_body(status: u16, body: &str) -> RealtimeError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(error) => RealtimeError::api(error.code, error.message),
        Err(_) => RealtimeError::api(status, format!("Request failed: {}", body)),
    }
}
