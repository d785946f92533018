//! services/app/src/session.rs
//!
//! The planner session: one user's in-flight draft schedule and the
//! orchestration around it. The session mediates between the generation
//! port and the core draft/directory logic, and owns the two guards the
//! core cannot: the generation-sequence token that drops stale schedule
//! responses, and the per-slot busy set that keeps one swap per slot in
//! flight.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use chefsync_core::domain::{
    CookingInput, CookingPlan, EnergyLevel, GroceryList, MealType, OptimizationGoal,
    PlanMetadata, RecipeOption, UserProfile,
};
use chefsync_core::grocery::{build_grocery_list, grocery_sources};
use chefsync_core::ports::{PortError, PortResult, RecipeGenerationService};
use chefsync_core::{ProfileDirectory, ScheduleDraft, SwapOutcome};

use crate::analytics;

/// Fewest pantry ingredients a generation request may carry; the ingredient
/// lock asks for three per meal, so anything less is rejected before a
/// request is attempted.
pub const MIN_INGREDIENTS: usize = 3;

/// What happened to a schedule-generation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The response became the active draft.
    Applied,
    /// A newer generation was started while this one was in flight; the
    /// response was discarded.
    Superseded,
}

/// One user's review-and-commit session over a draft schedule.
pub struct PlannerSession {
    planner: Arc<dyn RecipeGenerationService>,
    draft: Mutex<Option<ScheduleDraft>>,
    generation_seq: AtomicU64,
    busy_slots: Mutex<HashSet<(String, MealType)>>,
}

impl PlannerSession {
    pub fn new(planner: Arc<dyn RecipeGenerationService>) -> Self {
        Self {
            planner,
            draft: Mutex::new(None),
            generation_seq: AtomicU64::new(0),
            busy_slots: Mutex::new(HashSet::new()),
        }
    }

    /// Requests a fresh multi-day schedule and installs it as the draft.
    /// Each call takes a new sequence token; a response whose token is no
    /// longer the latest is dropped so an older request can never clobber a
    /// newer draft. On failure the previous draft survives untouched.
    pub async fn generate(
        &self,
        input: &CookingInput,
        days: u32,
    ) -> PortResult<GenerateOutcome> {
        if input.ingredients.len() < MIN_INGREDIENTS {
            return Err(PortError::Validation(format!(
                "select at least {MIN_INGREDIENTS} pantry ingredients before generating"
            )));
        }

        let token = self.generation_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let schedule = self.planner.generate_schedule(input, days).await?;

        // Token check and install happen under the same lock, so a newer
        // generation that lands in between cannot be overwritten.
        let mut guard = self.draft.lock().await;
        if self.generation_seq.load(Ordering::SeqCst) != token {
            info!(token, "newer generation in flight, discarding this schedule");
            return Ok(GenerateOutcome::Superseded);
        }
        *guard = Some(ScheduleDraft::new(schedule));
        analytics::track_event("schedule_generated", &input.target_date);
        Ok(GenerateOutcome::Applied)
    }

    /// Clones the current draft, for display or inspection.
    pub async fn draft(&self) -> Option<ScheduleDraft> {
        self.draft.lock().await.clone()
    }

    pub async fn discard(&self) {
        *self.draft.lock().await = None;
    }

    /// Swaps one slot of the draft for a freshly generated replacement.
    /// The slot is marked busy for the duration; a second swap for the same
    /// slot is rejected up front. Other slots are untouched either way, and
    /// a failed swap leaves the draft exactly as it was.
    pub async fn swap(
        &self,
        profile: &UserProfile,
        date: &str,
        meal_type: MealType,
    ) -> PortResult<SwapOutcome> {
        let key = (date.to_string(), meal_type);
        {
            let mut busy = self.busy_slots.lock().await;
            if !busy.insert(key.clone()) {
                return Err(PortError::Validation(format!(
                    "a swap for {date} {} is already running",
                    meal_type.label()
                )));
            }
        }

        let result = self.swap_slot(profile, date, meal_type).await;
        self.busy_slots.lock().await.remove(&key);
        result
    }

    async fn swap_slot(
        &self,
        profile: &UserProfile,
        date: &str,
        meal_type: MealType,
    ) -> PortResult<SwapOutcome> {
        let before = {
            let draft = self.draft.lock().await;
            let draft = draft
                .as_ref()
                .ok_or_else(|| PortError::Validation("no active draft to swap in".to_string()))?;
            draft.snapshot(date, meal_type).ok_or_else(|| {
                PortError::Validation(format!("the draft has no day {date}"))
            })?
        };

        let input = CookingInput::for_profile(profile, meal_type, date);
        let replacement = self.planner.swap_meal(&input, date, meal_type).await?;

        let mut guard = self.draft.lock().await;
        match guard.as_mut() {
            Some(draft) => Ok(draft.apply_swap(&before, replacement)),
            // Draft discarded while the swap was in flight.
            None => Ok(SwapOutcome::Stale),
        }
    }

    /// Promotes a single recipe into a durable plan for the given slot,
    /// with default metadata (normal energy, taste-optimized).
    pub async fn adopt_single(
        &self,
        directory: &ProfileDirectory,
        profile: &UserProfile,
        recipe: RecipeOption,
        date: &str,
        meal_type: MealType,
    ) -> PortResult<CookingPlan> {
        let plan = CookingPlan::adopt(recipe, default_metadata(profile, date, meal_type));
        directory.add_plan(profile.id, plan.clone()).await?;
        analytics::track_event("meal_planned", &plan.recipe_name);
        Ok(plan)
    }

    /// Commits every filled slot of the draft to the directory as one batch,
    /// then discards the draft. Empty slots are skipped, not errors.
    pub async fn commit_all(
        &self,
        directory: &ProfileDirectory,
        profile: &UserProfile,
    ) -> PortResult<Vec<CookingPlan>> {
        let mut guard = self.draft.lock().await;
        let draft = guard
            .as_ref()
            .ok_or_else(|| PortError::Validation("no active draft to commit".to_string()))?;
        let plans = draft.commit_plans(profile.diet, profile.city_type);
        directory.add_batch_plans(profile.id, plans.clone()).await?;
        *guard = None;
        analytics::track_event("schedule_committed", &plans.len().to_string());
        Ok(plans)
    }

    /// Ad-hoc recipe discovery, independent of any draft: a handful of
    /// creative ideas built from an explicit ingredient pick, priced for the
    /// user's economy tier.
    pub async fn discover(
        &self,
        profile: &UserProfile,
        ingredients: &[String],
    ) -> PortResult<Vec<RecipeOption>> {
        if ingredients.is_empty() {
            return Err(PortError::EmptyInput(
                "pick at least one ingredient to discover recipes".to_string(),
            ));
        }
        let recipes = self
            .planner
            .discover_recipes(ingredients, profile.city_type)
            .await?;
        analytics::track_event("recipes_discovered", &recipes.len().to_string());
        Ok(recipes)
    }

    /// Derives a grocery list from the active draft's slots when one exists,
    /// otherwise from the user's adopted plans.
    pub async fn grocery(&self, profile: &UserProfile) -> PortResult<GroceryList> {
        let sources = {
            let draft = self.draft.lock().await;
            grocery_sources(draft.as_ref(), profile)
        };
        build_grocery_list(self.planner.as_ref(), &sources).await
    }
}

fn default_metadata(profile: &UserProfile, date: &str, meal_type: MealType) -> PlanMetadata {
    PlanMetadata {
        meal_type,
        date: date.to_string(),
        energy_level: EnergyLevel::Normal,
        diet: profile.diet,
        city_type: profile.city_type,
        optimization_goal: OptimizationGoal::Taste,
    }
}
