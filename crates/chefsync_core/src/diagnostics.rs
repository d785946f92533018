//! crates/chefsync_core/src/diagnostics.rs
//!
//! A fixed battery of invariant checks over the current profile collection,
//! with an optional live round-trip through the generation service. Checks
//! are independent: one failing never skips the rest, and nothing here
//! mutates persisted state.

use chrono::Utc;
use tracing::warn;

use crate::domain::{
    CookingInput, EnergyLevel, MealType, Pantry, ScheduleAudit, TestResult, UserProfile,
    MIN_DAILY_BUDGET,
};
use crate::ports::{PortError, PortResult, RecipeGenerationService};

const DEEP_CHECK_NAME: &str = "AI deep diagnostic engine";

/// Runs every check in report order and returns one row per check. The AI
/// deep check contributes two rows when it runs, one `pending` row when no
/// profile qualifies, and one `failed` row when the round-trip errors; it
/// never propagates an error out of the runner.
pub async fn run_diagnostics(
    profiles: &[UserProfile],
    planner: &dyn RecipeGenerationService,
) -> Vec<TestResult> {
    let mut results = Vec::new();

    // Trivially true for any reachable collection; fails only when the store
    // itself is broken enough that we never get here.
    results.push(TestResult::passed("User persistence logic"));

    results.push(TestResult::check(
        "Pantry initialization integrity",
        profiles
            .iter()
            .all(|profile| profile.pantry.category_count() == Pantry::REQUIRED_CATEGORIES),
    ));

    results.push(TestResult::check(
        "Budget policy minimum",
        profiles
            .iter()
            .all(|profile| profile.daily_budget >= MIN_DAILY_BUDGET),
    ));

    results.push(TestResult::check(
        "Cooking window temporal logic",
        profiles
            .iter()
            .all(|profile| profile.reminder_preferences.window_is_ordered()),
    ));

    match profiles.iter().find(|profile| profile.onboarding_complete) {
        None => results.push(TestResult::pending(
            DEEP_CHECK_NAME,
            "complete onboarding for a profile to enable AI diagnostics",
        )),
        Some(profile) => match deep_check(planner, profile).await {
            Ok(audit) => {
                results.push(TestResult::check(
                    format!("AI compliance audit: {:?}", audit.compliance),
                    audit.compliance == crate::domain::Compliance::Compliant,
                ));
                let mut score_row = TestResult::check(
                    format!("AI culinary quality score: {}/100", audit.score),
                    audit.passes_quality_bar(),
                );
                score_row.error = Some(audit.report);
                results.push(score_row);
            }
            Err(err) => {
                warn!(%err, "AI deep diagnostic round-trip failed");
                results.push(TestResult::failed(
                    DEEP_CHECK_NAME,
                    "generation service failed to validate the diagnostic branch",
                ));
            }
        },
    }

    results
}

/// One live generation round-trip: a minimal 1-day schedule from the
/// profile's first five vegetable pantry items, then an audit of it.
async fn deep_check(
    planner: &dyn RecipeGenerationService,
    profile: &UserProfile,
) -> PortResult<ScheduleAudit> {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let input = CookingInput {
        diet: profile.diet,
        meal_type: MealType::Lunch,
        energy_level: EnergyLevel::Normal,
        time_available: profile.cooking_time_per_meal,
        kitchen_setup: profile.kitchen_setup,
        ingredients: profile.pantry.veg.iter().take(5).cloned().collect(),
        target_date: today,
        city_type: profile.city_type,
        daily_budget: profile.daily_budget,
        optimization_goal: None,
        allergies: None,
    };

    let schedule = planner.generate_schedule(&input, 1).await?;
    if schedule.days.is_empty() {
        return Err(PortError::Generation(
            "diagnostic schedule came back with no days".to_string(),
        ));
    }
    planner.audit_schedule(&schedule, &input).await
}
