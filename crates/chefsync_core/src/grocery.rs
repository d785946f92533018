//! crates/chefsync_core/src/grocery.rs
//!
//! Grocery-list derivation. The list itself comes from the generation
//! service; this module owns the client-side validation that happens before
//! any network call, plus the choice of which plans feed the consolidation.

use crate::domain::{CookingPlan, GroceryList, UserProfile};
use crate::ports::{PortError, PortResult, RecipeGenerationService};
use crate::schedule::ScheduleDraft;

/// Derives a consolidated grocery list from the given plans.
///
/// Rejected before any request is made:
/// - an empty plan set (`EmptyInput`);
/// - plans spanning more than one economy tier (`Validation`). Cost scaling
///   is tier-wide, so a mixed set has no single correct price basis.
pub async fn build_grocery_list(
    planner: &dyn RecipeGenerationService,
    plans: &[CookingPlan],
) -> PortResult<GroceryList> {
    if plans.is_empty() {
        return Err(PortError::EmptyInput(
            "no plans to consolidate into a grocery list".to_string(),
        ));
    }
    let tier = plans[0].metadata.city_type;
    if plans.iter().any(|plan| plan.metadata.city_type != tier) {
        return Err(PortError::Validation(
            "grocery consolidation requires all plans to share one economy tier".to_string(),
        ));
    }
    planner.generate_grocery_list(plans).await
}

/// Picks the plan set a grocery request should consolidate: the active
/// draft's filled slots when one exists, otherwise the user's adopted plans.
/// Draft slots are adopted ephemerally here; nothing is persisted.
pub fn grocery_sources(draft: Option<&ScheduleDraft>, profile: &UserProfile) -> Vec<CookingPlan> {
    match draft {
        Some(draft) if draft.has_filled_slots() => {
            draft.commit_plans(profile.diet, profile.city_type)
        }
        _ => profile.plans.clone(),
    }
}
