//! crates/chefsync_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the
//! generation service or the on-disk profile store.

use async_trait::async_trait;

use crate::domain::{
    CityType, CookingInput, CookingPlan, DailySchedule, GroceryList, MealType, RecipeOption,
    ScheduleAudit, UserProfile,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations.
///
/// Two failure classes never appear here by design: image-generation failures
/// are resolved to a fallback image inside the adapter, and storage
/// corruption is recovered as an empty store. Neither is allowed to surface
/// as an error to callers.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The generation service returned no usable structured result, either
    /// because retries were exhausted or because the payload violated the
    /// declared schema.
    #[error("generation failed: {0}")]
    Generation(String),
    /// An operation was invoked with no eligible source data.
    #[error("nothing to work with: {0}")]
    EmptyInput(String),
    /// Client-side rejection before any request is attempted.
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("an unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The generation service behind every recipe, schedule, grocery, and audit
/// request. Implementations own their retry policy; callers see only the
/// final outcome.
#[async_trait]
pub trait RecipeGenerationService: Send + Sync {
    /// Requests `days` sequential day plans starting at `input.target_date`.
    /// The returned schedule is a draft; nothing durable is created here.
    async fn generate_schedule(
        &self,
        input: &CookingInput,
        days: u32,
    ) -> PortResult<DailySchedule>;

    /// Requests one replacement recipe for a single slot, scoped to that
    /// meal's share (one third) of the daily budget.
    async fn swap_meal(
        &self,
        input: &CookingInput,
        date: &str,
        meal_type: MealType,
    ) -> PortResult<RecipeOption>;

    /// Consolidates ingredient usage across the given plans into a
    /// categorized list with cost estimates. Callers validate the plan set
    /// first (see [`crate::grocery::build_grocery_list`]); implementations
    /// may assume it is non-empty and single-tier.
    async fn generate_grocery_list(&self, plans: &[CookingPlan]) -> PortResult<GroceryList>;

    /// Independent quality/compliance check of a generated schedule. Used
    /// only by diagnostics.
    async fn audit_schedule(
        &self,
        schedule: &DailySchedule,
        input: &CookingInput,
    ) -> PortResult<ScheduleAudit>;

    /// Ad-hoc discovery: a handful of creative recipes built around the
    /// given ingredients, priced for the given economy tier.
    async fn discover_recipes(
        &self,
        ingredients: &[String],
        city_type: CityType,
    ) -> PortResult<Vec<RecipeOption>>;
}

/// Decorative image generation. Implementations must resolve every failure
/// (timeout, empty payload, malformed response) to the fixed fallback image
/// reference; image trouble never blocks plan adoption.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str, high_quality: bool) -> PortResult<String>;
}

/// The injected per-installation store holding every profile (with embedded
/// plans) as one serialized blob. Loaded once at startup, rewritten after
/// every mutation.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads all profiles. An unreadable or corrupt blob is recovered as an
    /// empty collection with a logged diagnostic, never an error.
    async fn load_all(&self) -> PortResult<Vec<UserProfile>>;

    /// Atomically replaces the persisted blob with the given collection.
    async fn save_all(&self, profiles: &[UserProfile]) -> PortResult<()>;
}
