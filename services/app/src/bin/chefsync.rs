//! services/app/src/bin/chefsync.rs
//!
//! Wires the adapters to the core, hydrates the profile directory from
//! disk, and runs the diagnostics battery over the current state.

use std::sync::Arc;

use app_lib::{
    adapters::{
        image_llm::GeminiImageAdapter, recipe_llm::GeminiRecipeAdapter, storage::JsonFileStore,
    },
    analytics,
    config::Config,
    error::AppError,
    state::AppState,
};
use async_openai::{config::OpenAIConfig, Client};
use chefsync_core::domain::TestStatus;
use chefsync_core::{diagnostics, ProfileDirectory};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded.");

    // --- 2. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(&config.gemini_api_key)
        .with_api_base(&config.gemini_api_base);
    let llm_client = Client::with_config(openai_config);

    let recipe_adapter = Arc::new(GeminiRecipeAdapter::new(
        llm_client.clone(),
        config.recipe_model.clone(),
        config.request_timeout,
    ));
    let image_adapter = Arc::new(GeminiImageAdapter::new(
        llm_client.clone(),
        config.image_model.clone(),
        config.image_model_hq.clone(),
        config.request_timeout,
    ));
    let store = Arc::new(JsonFileStore::new(config.storage_path.clone()));

    // --- 3. Hydrate the Profile Directory ---
    info!(path = %config.storage_path.display(), "loading profiles");
    let directory = Arc::new(ProfileDirectory::load(store).await?);

    let state = AppState {
        config: config.clone(),
        directory: directory.clone(),
        recipes: recipe_adapter,
        images: image_adapter,
    };

    // --- 4. Run the Diagnostics Battery ---
    analytics::track_event("diagnostics_started", "engine scan");
    let profiles = state.directory.profiles().await;
    let results = diagnostics::run_diagnostics(&profiles, state.recipes.as_ref()).await;

    for result in &results {
        match result.status {
            TestStatus::Passed => info!(check = %result.name, "passed"),
            TestStatus::Pending => info!(
                check = %result.name,
                detail = result.error.as_deref().unwrap_or(""),
                "pending"
            ),
            TestStatus::Failed => warn!(
                check = %result.name,
                detail = result.error.as_deref().unwrap_or(""),
                "FAILED"
            ),
        }
    }

    let passed = results
        .iter()
        .filter(|r| r.status == TestStatus::Passed)
        .count();
    info!(passed, total = results.len(), "diagnostics complete");

    Ok(())
}
