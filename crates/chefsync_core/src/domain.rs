//! crates/chefsync_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs double as the wire shapes: they are persisted as the profile
//! blob and parsed from the generation service's JSON responses, so fields
//! carry `camelCase` renames and required-on-the-wire fields have no serde
//! defaults. A response missing a required field fails to deserialize, which
//! is how malformed payloads are rejected at the boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum acceptable daily budget, in whole currency units.
pub const MIN_DAILY_BUDGET: u32 = 50;

/// Placeholder shown for any plan whose image was never generated (or whose
/// generation failed).
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1495521821757-a1efb6729352?q=80&w=800";

//=========================================================================================
// Enumerations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietType {
    Veg,
    NonVeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenSetup {
    Basic,
    Medium,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// The three slots of a day, in display order. Day flattening iterates
    /// this so committed plans always come out breakfast-first.
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyLevel {
    Low,
    Normal,
    High,
}

/// Coarse cost-of-living bucket used to scale budget expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityType {
    #[serde(rename = "METRO")]
    Metro,
    #[serde(rename = "TIER_2")]
    Tier2,
    #[serde(rename = "TIER_3")]
    Tier3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationGoal {
    Taste,
    Protein,
    Cheapest,
    Fastest,
}

/// Affects onboarding defaults only; no component branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    WorkingProfessional,
    Student,
    Household,
}

/// The generation service's verdict on whether a recipe fits its share of
/// the daily budget. Wire strings are fixed by the response contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetFeasibility {
    #[serde(rename = "Budget Validated")]
    Validated,
    #[serde(rename = "Budget Risk")]
    Risk,
}

//=========================================================================================
// User Profile and Pantry
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderTime {
    Morning,
    Evening,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPreferences {
    pub reminder_time: ReminderTime,
    /// Start of the cooking window, `"HH:MM"`.
    pub cooking_slot_start: String,
    /// End of the cooking window, `"HH:MM"`. Must parse strictly later than
    /// the start.
    pub cooking_slot_end: String,
    pub reminders_per_day: u8,
}

impl ReminderPreferences {
    /// True when both window bounds parse and the end is strictly after the
    /// start. A garbled time string fails the check rather than erroring.
    pub fn window_is_ordered(&self) -> bool {
        match (
            parse_clock(&self.cooking_slot_start),
            parse_clock(&self.cooking_slot_end),
        ) {
            (Some(start), Some(end)) => end > start,
            _ => false,
        }
    }
}

impl Default for ReminderPreferences {
    fn default() -> Self {
        Self {
            reminder_time: ReminderTime::Evening,
            cooking_slot_start: "18:00".to_string(),
            cooking_slot_end: "20:00".to_string(),
            reminders_per_day: 1,
        }
    }
}

/// Parses `"HH:MM"` into a comparable minutes-since-midnight value.
fn parse_clock(value: &str) -> Option<u32> {
    let (hours, minutes) = value.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PantryCategory {
    Veg,
    NonVeg,
    Oils,
    Masalas,
}

/// Four disjoint named ingredient lists. Duplicates are allowed but carry no
/// meaning; callers treat each list as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pantry {
    pub veg: Vec<String>,
    pub non_veg: Vec<String>,
    pub oils: Vec<String>,
    pub masalas: Vec<String>,
}

impl Pantry {
    /// Number of categories a well-formed pantry carries. Diagnostics checks
    /// the live shape against this rather than assuming it.
    pub const REQUIRED_CATEGORIES: usize = 4;

    pub fn category_count(&self) -> usize {
        // One entry per named list; the count only changes if the shape does.
        [&self.veg, &self.non_veg, &self.oils, &self.masalas].len()
    }

    fn list_mut(&mut self, category: PantryCategory) -> &mut Vec<String> {
        match category {
            PantryCategory::Veg => &mut self.veg,
            PantryCategory::NonVeg => &mut self.non_veg,
            PantryCategory::Oils => &mut self.oils,
            PantryCategory::Masalas => &mut self.masalas,
        }
    }

    pub fn add_item(&mut self, category: PantryCategory, item: impl Into<String>) {
        self.list_mut(category).push(item.into());
    }

    pub fn remove_item(&mut self, category: PantryCategory, item: &str) {
        self.list_mut(category).retain(|existing| existing != item);
    }

    /// Every ingredient across all four lists, in category order.
    pub fn all_items(&self) -> Vec<String> {
        self.veg
            .iter()
            .chain(self.non_veg.iter())
            .chain(self.oils.iter())
            .chain(self.masalas.iter())
            .cloned()
            .collect()
    }
}

/// One user of the planner, including everything gathered during onboarding
/// and the durable plan collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub city_type: CityType,
    /// Whole currency units per day; `MIN_DAILY_BUDGET` is the policy floor.
    pub daily_budget: u32,
    pub diet: DietType,
    pub kitchen_setup: KitchenSetup,
    pub pantry: Pantry,
    /// Most-recently adopted first. Logically keyed by (date, meal type);
    /// `ProfileDirectory` maintains that uniqueness.
    pub plans: Vec<CookingPlan>,
    #[serde(default)]
    pub high_quality_visuals: bool,
    #[serde(default)]
    pub persona: Option<Persona>,
    #[serde(default)]
    pub onboarding_complete: bool,
    pub reminder_preferences: ReminderPreferences,
    #[serde(default)]
    pub allergies: Option<String>,
    /// Minutes the user is willing to spend on one meal.
    pub cooking_time_per_meal: u32,
}

impl UserProfile {
    /// Creates an empty profile at onboarding start. The id is generated once
    /// and never changes.
    pub fn new(
        name: impl Into<String>,
        age: u32,
        city_type: CityType,
        diet: DietType,
        kitchen_setup: KitchenSetup,
        daily_budget: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age,
            city_type,
            daily_budget,
            diet,
            kitchen_setup,
            pantry: Pantry::default(),
            plans: Vec::new(),
            high_quality_visuals: false,
            persona: None,
            onboarding_complete: false,
            reminder_preferences: ReminderPreferences::default(),
            allergies: None,
            cooking_time_per_meal: 30,
        }
    }
}

//=========================================================================================
// Generation Inputs
//=========================================================================================

/// The structured request handed to the generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingInput {
    pub diet: DietType,
    pub meal_type: MealType,
    pub energy_level: EnergyLevel,
    /// Minutes available for cooking.
    pub time_available: u32,
    pub kitchen_setup: KitchenSetup,
    pub ingredients: Vec<String>,
    /// ISO calendar date (`YYYY-MM-DD`) of the first day requested.
    pub target_date: String,
    pub city_type: CityType,
    pub daily_budget: u32,
    #[serde(default)]
    pub optimization_goal: Option<OptimizationGoal>,
    #[serde(default)]
    pub allergies: Option<String>,
}

impl CookingInput {
    /// Builds a request from a profile's constraints. Swaps and diagnostics
    /// both go through here so the constraint set stays consistent.
    pub fn for_profile(profile: &UserProfile, meal_type: MealType, target_date: &str) -> Self {
        Self {
            diet: profile.diet,
            meal_type,
            energy_level: EnergyLevel::Normal,
            time_available: profile.cooking_time_per_meal,
            kitchen_setup: profile.kitchen_setup,
            // First ten pantry items keep the swap prompt small.
            ingredients: profile.pantry.all_items().into_iter().take(10).collect(),
            target_date: target_date.to_string(),
            city_type: profile.city_type,
            daily_budget: profile.daily_budget,
            optimization_goal: None,
            allergies: profile.allergies.clone(),
        }
    }
}

//=========================================================================================
// Recipes, Plans, and Schedules
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    pub original: String,
    pub replacement: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingStep {
    pub instruction: String,
    #[serde(default)]
    pub time_estimate: Option<String>,
}

/// A proposed recipe as returned by the generation service. Never persisted
/// directly; it must be adopted into a [`CookingPlan`] to survive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeOption {
    pub recipe_name: String,
    pub description: String,
    pub total_time: String,
    pub ingredients_used: Vec<String>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
    pub prep_checklist: Vec<String>,
    pub cooking_sequence: Vec<CookingStep>,
    #[serde(default)]
    pub additional_notes: String,
    pub image_prompt: String,
    pub budget_feasibility: BudgetFeasibility,
    pub estimated_cost_value: f64,
    #[serde(default)]
    pub is_fallback: Option<bool>,
    /// Up to two ranked cheaper alternatives, present when the service
    /// flags this recipe as a budget risk.
    #[serde(default)]
    pub fallbacks: Option<Vec<RecipeOption>>,
}

/// Context captured at adoption time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    pub meal_type: MealType,
    /// ISO calendar date the plan is scheduled for.
    pub date: String,
    pub energy_level: EnergyLevel,
    pub diet: DietType,
    pub city_type: CityType,
    pub optimization_goal: OptimizationGoal,
}

/// A durable, adopted plan. Never mutated in place; replacing a slot is
/// delete-plus-insert in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingPlan {
    pub id: Uuid,
    pub recipe_name: String,
    pub description: String,
    pub total_time: String,
    pub ingredients_used: Vec<String>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
    pub prep_checklist: Vec<String>,
    pub cooking_sequence: Vec<CookingStep>,
    #[serde(default)]
    pub additional_notes: String,
    pub image_url: String,
    pub budget_feasibility: BudgetFeasibility,
    pub estimated_cost_value: f64,
    #[serde(default)]
    pub is_fallback: Option<bool>,
    #[serde(default)]
    pub fallbacks: Option<Vec<RecipeOption>>,
    pub metadata: PlanMetadata,
}

impl CookingPlan {
    /// Promotes a recipe into a durable plan. The id is assigned here, never
    /// by the generator, and the image starts as the fixed placeholder until
    /// a generated one is resolved.
    pub fn adopt(recipe: RecipeOption, metadata: PlanMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe_name: recipe.recipe_name,
            description: recipe.description,
            total_time: recipe.total_time,
            ingredients_used: recipe.ingredients_used,
            substitutions: recipe.substitutions,
            prep_checklist: recipe.prep_checklist,
            cooking_sequence: recipe.cooking_sequence,
            additional_notes: recipe.additional_notes,
            image_url: FALLBACK_IMAGE_URL.to_string(),
            budget_feasibility: recipe.budget_feasibility,
            estimated_cost_value: recipe.estimated_cost_value,
            is_fallback: recipe.is_fallback,
            fallbacks: recipe.fallbacks,
            metadata,
        }
    }

    /// The (date, meal type) pair uniquely identifying this meal occasion.
    pub fn slot(&self) -> (&str, MealType) {
        (&self.metadata.date, self.metadata.meal_type)
    }
}

/// One day of a draft schedule. Slots are optional: a slot can be emptied by
/// an unresolved swap and is simply skipped at commit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: String,
    #[serde(default)]
    pub breakfast: Option<RecipeOption>,
    #[serde(default)]
    pub lunch: Option<RecipeOption>,
    #[serde(default)]
    pub dinner: Option<RecipeOption>,
}

impl DayPlan {
    pub fn slot(&self, meal_type: MealType) -> &Option<RecipeOption> {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
        }
    }

    pub fn slot_mut(&mut self, meal_type: MealType) -> &mut Option<RecipeOption> {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
        }
    }
}

/// A freshly generated multi-day schedule. Exists only between generation
/// and commit/discard; never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySchedule {
    pub days: Vec<DayPlan>,
}

//=========================================================================================
// Grocery Lists
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub item: String,
    pub quantity: String,
    pub estimated_cost: String,
    pub category: String,
}

/// Consolidated shopping list derived on demand from a set of plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    pub items: Vec<GroceryItem>,
    pub total_estimated_budget: String,
    #[serde(default)]
    pub budget_feasibility_note: Option<String>,
}

impl GroceryList {
    /// Items grouped by category, preserving first-seen category order.
    pub fn by_category(&self) -> Vec<(String, Vec<&GroceryItem>)> {
        let mut groups: Vec<(String, Vec<&GroceryItem>)> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|(name, _)| *name == item.category) {
                Some((_, members)) => members.push(item),
                None => groups.push((item.category.clone(), vec![item])),
            }
        }
        groups
    }
}

//=========================================================================================
// Audits and Diagnostics
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compliance {
    Compliant,
    NonCompliant,
}

/// Independent quality/compliance verdict on a generated schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAudit {
    /// 0 to 100.
    pub score: u8,
    pub report: String,
    pub compliance: Compliance,
}

impl ScheduleAudit {
    /// A score of exactly 70 fails; the bar is strictly greater.
    pub fn passes_quality_bar(&self) -> bool {
        self.score > 70
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Pending,
}

/// One row of a diagnostics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl TestResult {
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn pending(name: impl Into<String>, why: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Pending,
            error: Some(why.into()),
        }
    }

    pub fn check(name: impl Into<String>, ok: bool) -> Self {
        if ok {
            Self::passed(name)
        } else {
            Self {
                name: name.into(),
                status: TestStatus::Failed,
                error: None,
            }
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
