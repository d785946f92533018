pub mod diagnostics;
pub mod directory;
pub mod domain;
pub mod grocery;
pub mod ports;
pub mod schedule;

pub use directory::ProfileDirectory;
pub use domain::{
    BudgetFeasibility, CityType, Compliance, CookingInput, CookingPlan, CookingStep,
    DailySchedule, DayPlan, DietType, EnergyLevel, GroceryItem, GroceryList, KitchenSetup,
    MealType, OptimizationGoal, Pantry, PantryCategory, Persona, PlanMetadata, RecipeOption,
    ReminderPreferences, ReminderTime, ScheduleAudit, Substitution, TestResult, TestStatus,
    UserProfile, FALLBACK_IMAGE_URL, MIN_DAILY_BUDGET,
};
pub use ports::{
    ImageGenerationService, PortError, PortResult, ProfileStore, RecipeGenerationService,
};
pub use schedule::{ScheduleDraft, SlotSnapshot, SwapOutcome};
