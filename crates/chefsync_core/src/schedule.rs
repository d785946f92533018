//! crates/chefsync_core/src/schedule.rs
//!
//! The draft side of the reconciler: one freshly generated schedule held in
//! memory while the user reviews it. Single slots can be swapped for a
//! replacement recipe without touching anything durable; commit flattens the
//! surviving slots into plans for the directory.

use tracing::info;

use crate::domain::{
    CityType, CookingPlan, DailySchedule, DietType, EnergyLevel, MealType, OptimizationGoal,
    PlanMetadata, RecipeOption,
};

/// What a slot looked like when a swap request went out. Used to detect that
/// the slot changed underneath an in-flight swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSnapshot {
    pub date: String,
    pub meal_type: MealType,
    pub recipe_name: Option<String>,
}

/// Outcome of applying a swap response to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The slot was replaced.
    Applied,
    /// The slot's content changed between request and response; the response
    /// was discarded (last response wins).
    Stale,
}

/// A not-yet-persisted multi-day schedule awaiting review.
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    schedule: DailySchedule,
}

impl ScheduleDraft {
    pub fn new(schedule: DailySchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &DailySchedule {
        &self.schedule
    }

    fn slot(&self, date: &str, meal_type: MealType) -> Option<&Option<RecipeOption>> {
        self.schedule
            .days
            .iter()
            .find(|day| day.date == date)
            .map(|day| day.slot(meal_type))
    }

    /// Captures the current occupant of a slot before a swap request is sent.
    /// Returns `None` when the draft has no such date.
    pub fn snapshot(&self, date: &str, meal_type: MealType) -> Option<SlotSnapshot> {
        self.slot(date, meal_type).map(|occupant| SlotSnapshot {
            date: date.to_string(),
            meal_type,
            recipe_name: occupant.as_ref().map(|recipe| recipe.recipe_name.clone()),
        })
    }

    /// Replaces exactly one slot with the swap result, leaving every other
    /// slot untouched. The replacement is discarded when the slot no longer
    /// matches the pre-request snapshot.
    pub fn apply_swap(&mut self, before: &SlotSnapshot, replacement: RecipeOption) -> SwapOutcome {
        let Some(day) = self
            .schedule
            .days
            .iter_mut()
            .find(|day| day.date == before.date)
        else {
            return SwapOutcome::Stale;
        };
        let occupant = day.slot_mut(before.meal_type);
        let current_name = occupant.as_ref().map(|recipe| recipe.recipe_name.as_str());
        if current_name != before.recipe_name.as_deref() {
            info!(
                date = %before.date,
                meal = before.meal_type.label(),
                "slot changed while swap was in flight; discarding response"
            );
            return SwapOutcome::Stale;
        }
        *occupant = Some(replacement);
        SwapOutcome::Applied
    }

    /// Flattens every day's slots into adoptable plans, breakfast first,
    /// skipping any slot left empty. Ids are assigned here, at adoption.
    pub fn commit_plans(&self, diet: DietType, city_type: CityType) -> Vec<CookingPlan> {
        self.schedule
            .days
            .iter()
            .flat_map(|day| {
                MealType::ALL.into_iter().filter_map(|meal_type| {
                    day.slot(meal_type).clone().map(|recipe| {
                        CookingPlan::adopt(
                            recipe,
                            PlanMetadata {
                                meal_type,
                                date: day.date.clone(),
                                energy_level: EnergyLevel::Normal,
                                diet,
                                city_type,
                                optimization_goal: OptimizationGoal::Taste,
                            },
                        )
                    })
                })
            })
            .collect()
    }

    /// True when at least one slot holds a recipe.
    pub fn has_filled_slots(&self) -> bool {
        self.schedule.days.iter().any(|day| {
            MealType::ALL
                .into_iter()
                .any(|meal_type| day.slot(meal_type).is_some())
        })
    }
}
