//! Shared doubles and builders for the app service integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use chefsync_core::domain::{
    BudgetFeasibility, CityType, CookingInput, CookingPlan, DailySchedule, DayPlan, DietType,
    GroceryItem, GroceryList, KitchenSetup, MealType, RecipeOption, ScheduleAudit, UserProfile,
};
use chefsync_core::ports::{
    ImageGenerationService, PortError, PortResult, ProfileStore, RecipeGenerationService,
};

pub fn profile(name: &str) -> UserProfile {
    let mut profile = UserProfile::new(
        name,
        31,
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
    ];
    profile.pantry.masalas = vec!["turmeric".into()];
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

pub fn day(date: &str, tag: &str) -> DayPlan {
    DayPlan {
        date: date.to_string(),
        breakfast: Some(recipe(&format!("{tag} breakfast"))),
        lunch: Some(recipe(&format!("{tag} lunch"))),
        dinner: Some(recipe(&format!("{tag} dinner"))),
    }
}

pub fn schedule(tag: &str, dates: &[&str]) -> DailySchedule {
    DailySchedule {
        days: dates.iter().map(|date| day(date, tag)).collect(),
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

//=========================================================================================
// Scripted generation service double
//=========================================================================================

/// Replays a script of responses, one entry per call, each with an optional
/// artificial latency so tests can interleave in-flight requests under
/// paused tokio time. An exhausted script or a `None` entry fails the call.
#[derive(Default)]
pub struct ScriptedPlanner {
    pub schedules: Mutex<VecDeque<(Duration, Option<DailySchedule>)>>,
    pub swaps: Mutex<VecDeque<(Duration, Option<RecipeOption>)>>,
    pub grocery: Option<GroceryList>,
    pub discover: Option<Vec<RecipeOption>>,
    pub schedule_calls: AtomicUsize,
    pub swap_calls: AtomicUsize,
    pub grocery_calls: AtomicUsize,
    pub discover_calls: AtomicUsize,
}

impl ScriptedPlanner {
    pub fn with_schedule(schedule: DailySchedule) -> Self {
        let planner = Self::default();
        planner.push_schedule(Duration::ZERO, Some(schedule));
        planner
    }

    pub fn push_schedule(&self, delay: Duration, response: Option<DailySchedule>) {
        self.schedules.lock().unwrap().push_back((delay, response));
    }

    pub fn push_swap(&self, delay: Duration, response: Option<RecipeOption>) {
        self.swaps.lock().unwrap().push_back((delay, response));
    }
}

#[async_trait]
impl RecipeGenerationService for ScriptedPlanner {
    async fn generate_schedule(
        &self,
        _input: &CookingInput,
        _days: u32,
    ) -> PortResult<DailySchedule> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.schedules.lock().unwrap().pop_front();
        match entry {
            Some((delay, response)) => {
                tokio::time::sleep(delay).await;
                response.ok_or_else(|| PortError::Generation("scripted failure".to_string()))
            }
            None => Err(PortError::Generation("script exhausted".to_string())),
        }
    }

    async fn swap_meal(
        &self,
        _input: &CookingInput,
        _date: &str,
        _meal_type: MealType,
    ) -> PortResult<RecipeOption> {
        self.swap_calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.swaps.lock().unwrap().pop_front();
        match entry {
            Some((delay, response)) => {
                tokio::time::sleep(delay).await;
                response.ok_or_else(|| PortError::Generation("scripted failure".to_string()))
            }
            None => Err(PortError::Generation("script exhausted".to_string())),
        }
    }

    async fn generate_grocery_list(&self, _plans: &[CookingPlan]) -> PortResult<GroceryList> {
        self.grocery_calls.fetch_add(1, Ordering::SeqCst);
        self.grocery
            .clone()
            .ok_or_else(|| PortError::Generation("scripted failure".to_string()))
    }

    async fn audit_schedule(
        &self,
        _schedule: &DailySchedule,
        _input: &CookingInput,
    ) -> PortResult<ScheduleAudit> {
        Err(PortError::Generation("not scripted".to_string()))
    }

    async fn discover_recipes(
        &self,
        _ingredients: &[String],
        _city_type: CityType,
    ) -> PortResult<Vec<RecipeOption>> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        self.discover
            .clone()
            .ok_or_else(|| PortError::Generation("scripted failure".to_string()))
    }
}

//=========================================================================================
// Image service double
//=========================================================================================

/// Always-succeeding image double that records the requested quality tier.
pub struct StubImages {
    pub url: String,
    pub calls: AtomicUsize,
    pub last_high_quality: Mutex<Option<bool>>,
}

impl Default for StubImages {
    fn default() -> Self {
        Self {
            url: "data:image/png;base64,QUJD".to_string(),
            calls: AtomicUsize::new(0),
            last_high_quality: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ImageGenerationService for StubImages {
    async fn generate_image(&self, _prompt: &str, high_quality: bool) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_high_quality.lock().unwrap() = Some(high_quality);
        Ok(self.url.clone())
    }
}

//=========================================================================================
// Profile store double
//=========================================================================================

#[derive(Default)]
pub struct MemoryStore {
    pub persisted: Mutex<Vec<UserProfile>>,
}

impl MemoryStore {
    pub fn seeded(profiles: Vec<UserProfile>) -> Self {
        Self {
            persisted: Mutex::new(profiles),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn load_all(&self) -> PortResult<Vec<UserProfile>> {
        Ok(self.persisted.lock().unwrap().clone())
    }

    async fn save_all(&self, profiles: &[UserProfile]) -> PortResult<()> {
        *self.persisted.lock().unwrap() = profiles.to_vec();
        Ok(())
    }
}
