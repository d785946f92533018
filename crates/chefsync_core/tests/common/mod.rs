//! Shared test doubles and builders for the core integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use chefsync_core::domain::{
    BudgetFeasibility, CityType, Compliance, CookingInput, CookingPlan, DailySchedule, DayPlan,
    DietType, EnergyLevel, GroceryItem, GroceryList, KitchenSetup, MealType, OptimizationGoal,
    PlanMetadata, RecipeOption, ScheduleAudit, UserProfile,
};
use chefsync_core::ports::{
    PortError, PortResult, ProfileStore, RecipeGenerationService,
};

//=========================================================================================
// Builders
//=========================================================================================

pub fn profile(name: &str) -> UserProfile {
    let mut profile = UserProfile::new(
        name,
        29,
        CityType::Metro,
        DietType::Veg,
        KitchenSetup::Medium,
        150,
    );
    profile.pantry.veg = vec![
        "spinach".into(),
        "potato".into(),
        "tomato".into(),
        "onion".into(),
        "peas".into(),
        "carrot".into(),
    ];
    profile.pantry.oils = vec!["ghee".into()];
    profile.pantry.masalas = vec!["turmeric".into(), "garam masala".into()];
    profile
}

pub fn recipe(name: &str) -> RecipeOption {
    RecipeOption {
        recipe_name: name.to_string(),
        description: format!("{name}, weeknight style"),
        total_time: "30 mins".to_string(),
        ingredients_used: vec!["onion".into(), "tomato".into(), "spinach".into()],
        substitutions: Vec::new(),
        prep_checklist: vec!["wash and chop".into()],
        cooking_sequence: Vec::new(),
        additional_notes: String::new(),
        image_prompt: format!("plated {name}"),
        budget_feasibility: BudgetFeasibility::Validated,
        estimated_cost_value: 45.0,
        is_fallback: None,
        fallbacks: None,
    }
}

pub fn plan(name: &str, date: &str, meal_type: MealType) -> CookingPlan {
    plan_for_tier(name, date, meal_type, CityType::Metro)
}

pub fn plan_for_tier(name: &str, date: &str, meal_type: MealType, tier: CityType) -> CookingPlan {
    CookingPlan::adopt(
        recipe(name),
        PlanMetadata {
            meal_type,
            date: date.to_string(),
            energy_level: EnergyLevel::Normal,
            diet: DietType::Veg,
            city_type: tier,
            optimization_goal: OptimizationGoal::Taste,
        },
    )
}

pub fn one_day_schedule(date: &str) -> DailySchedule {
    DailySchedule {
        days: vec![DayPlan {
            date: date.to_string(),
            breakfast: Some(recipe("Poha")),
            lunch: Some(recipe("Dal Tadka")),
            dinner: Some(recipe("Khichdi")),
        }],
    }
}

pub fn grocery_list() -> GroceryList {
    GroceryList {
        items: vec![GroceryItem {
            item: "Onion".into(),
            quantity: "1 kg".into(),
            estimated_cost: "₹40".into(),
            category: "Vegetables".into(),
        }],
        total_estimated_budget: "₹40".into(),
        budget_feasibility_note: None,
    }
}

pub fn audit(score: u8, compliance: Compliance) -> ScheduleAudit {
    ScheduleAudit {
        score,
        report: "stubbed audit report".to_string(),
        compliance,
    }
}

//=========================================================================================
// Generation service stub
//=========================================================================================

/// Canned-response double for the generation port. A `None` slot makes the
/// corresponding operation fail the way an exhausted retry loop would.
#[derive(Default)]
pub struct StubPlanner {
    pub schedule: Option<DailySchedule>,
    pub swap: Option<RecipeOption>,
    pub grocery: Option<GroceryList>,
    pub audit: Option<ScheduleAudit>,
    pub discover: Option<Vec<RecipeOption>>,
    pub schedule_calls: AtomicUsize,
    pub swap_calls: AtomicUsize,
    pub grocery_calls: AtomicUsize,
    pub audit_calls: AtomicUsize,
    pub discover_calls: AtomicUsize,
}

impl StubPlanner {
    pub fn total_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
            + self.swap_calls.load(Ordering::SeqCst)
            + self.grocery_calls.load(Ordering::SeqCst)
            + self.audit_calls.load(Ordering::SeqCst)
            + self.discover_calls.load(Ordering::SeqCst)
    }

    fn respond<T: Clone>(slot: &Option<T>, what: &str) -> PortResult<T> {
        slot.clone()
            .ok_or_else(|| PortError::Generation(format!("stubbed {what} failure")))
    }
}

#[async_trait]
impl RecipeGenerationService for StubPlanner {
    async fn generate_schedule(
        &self,
        _input: &CookingInput,
        _days: u32,
    ) -> PortResult<DailySchedule> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        Self::respond(&self.schedule, "schedule")
    }

    async fn swap_meal(
        &self,
        _input: &CookingInput,
        _date: &str,
        _meal_type: MealType,
    ) -> PortResult<RecipeOption> {
        self.swap_calls.fetch_add(1, Ordering::SeqCst);
        Self::respond(&self.swap, "swap")
    }

    async fn generate_grocery_list(&self, _plans: &[CookingPlan]) -> PortResult<GroceryList> {
        self.grocery_calls.fetch_add(1, Ordering::SeqCst);
        Self::respond(&self.grocery, "grocery list")
    }

    async fn audit_schedule(
        &self,
        _schedule: &DailySchedule,
        _input: &CookingInput,
    ) -> PortResult<ScheduleAudit> {
        self.audit_calls.fetch_add(1, Ordering::SeqCst);
        Self::respond(&self.audit, "audit")
    }

    async fn discover_recipes(
        &self,
        _ingredients: &[String],
        _city_type: CityType,
    ) -> PortResult<Vec<RecipeOption>> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        Self::respond(&self.discover, "discovery")
    }
}

//=========================================================================================
// Profile store stub
//=========================================================================================

/// In-memory store double that records every flush.
#[derive(Default)]
pub struct MemoryStore {
    pub persisted: Mutex<Vec<UserProfile>>,
    pub save_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn seeded(profiles: Vec<UserProfile>) -> Self {
        Self {
            persisted: Mutex::new(profiles),
            save_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn load_all(&self) -> PortResult<Vec<UserProfile>> {
        Ok(self.persisted.lock().unwrap().clone())
    }

    async fn save_all(&self, profiles: &[UserProfile]) -> PortResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        *self.persisted.lock().unwrap() = profiles.to_vec();
        Ok(())
    }
}
