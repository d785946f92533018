//! services/app/src/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use uuid::Uuid;

use chefsync_core::ports::{
    ImageGenerationService, PortError, PortResult, RecipeGenerationService,
};
use chefsync_core::ProfileDirectory;

use crate::config::Config;

/// The shared application state, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<ProfileDirectory>,
    pub recipes: Arc<dyn RecipeGenerationService>,
    pub images: Arc<dyn ImageGenerationService>,
}

impl AppState {
    /// Resolves the decorative image for an adopted plan. Plans start with
    /// the placeholder image; this renders the real one at the profile's
    /// quality tier and stores it. The image adapter already resolves its
    /// own failures to the fallback URL, so the only errors here are
    /// directory ones.
    pub async fn illustrate_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        image_prompt: &str,
    ) -> PortResult<String> {
        let profile = self
            .directory
            .get(user_id)
            .await
            .ok_or_else(|| PortError::Unexpected(format!("unknown profile {user_id}")))?;

        let url = self
            .images
            .generate_image(image_prompt, profile.high_quality_visuals)
            .await?;

        let stored = url.clone();
        self.directory
            .update_profile(user_id, move |profile| {
                if let Some(plan) = profile.plans.iter_mut().find(|plan| plan.id == plan_id) {
                    plan.image_url = stored;
                }
            })
            .await?;
        Ok(url)
    }
}
