use std::sync::Arc;
use std::time::Duration;

use crate::{config::Config, events::GroceryChangeBroadcaster};
use indkob_core::{
    events::GroceryChangeNotifier,
    grocery::{GroceryEntryService, GroceryEntryServiceTrait},
    items::{ItemService, ItemServiceTrait},
    meal_plan::{MealPlanService, MealPlanServiceTrait},
};
use indkob_storage_memory::{
    grocery::GroceryEntryRepository, items::ItemRepository, meal_plan::MealPlanRepository,
    MemoryDb,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub grocery_service: Arc<dyn GroceryEntryServiceTrait + Send + Sync>,
    pub item_service: Arc<dyn ItemServiceTrait + Send + Sync>,
    pub meal_plan_service: Arc<dyn MealPlanServiceTrait + Send + Sync>,
    /// Push side of the grocery hub; services hold it as their notifier.
    pub change_notifier: GroceryChangeBroadcaster,
    pub hub_keep_alive: Duration,
}

pub fn init_tracing() {
    let log_format = std::env::var("INDKOB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db = MemoryDb::new();

    let change_notifier = GroceryChangeBroadcaster::new(config.event_buffer);
    let notifier: Arc<dyn GroceryChangeNotifier> = Arc::new(change_notifier.clone());

    let item_repository = Arc::new(ItemRepository::new(db.clone()));
    let item_service = Arc::new(ItemService::new(item_repository));
    if config.seed_default_items {
        let added = item_service.seed_default_items().await?;
        tracing::info!("Default items seeded: {}", added);
    }

    let grocery_repository = Arc::new(GroceryEntryRepository::new(db.clone()));
    let grocery_service = Arc::new(GroceryEntryService::new(grocery_repository, notifier));

    let meal_plan_repository = Arc::new(MealPlanRepository::new(db));
    let meal_plan_service = Arc::new(MealPlanService::new(meal_plan_repository));

    Ok(Arc::new(AppState {
        grocery_service,
        item_service,
        meal_plan_service,
        change_notifier,
        hub_keep_alive: config.hub_keep_alive,
    }))
}
