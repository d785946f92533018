//! services/app/src/adapters/recipe_llm.rs
//!
//! This module contains the adapter for the recipe/schedule generation LLM.
//! It implements the `RecipeGenerationService` port from the `core` crate,
//! speaking to Gemini through its OpenAI-compatibility endpoint.
//!
//! Every request declares a strict JSON output schema, and every response is
//! re-validated by deserializing into the core domain shapes; a payload
//! missing a required field is rejected as a generation failure, never
//! passed through partially parsed.

const SYSTEM_INSTRUCTIONS: &str = "You are a professional chef and strict budget meal \
planning auditor for Indian home cooks. You respond with JSON only, matching the declared \
output schema exactly. Never include prose outside the JSON object.";

const SCHEDULE_PROMPT_TEMPLATE: &str = r#"Generate a full {days}-day cooking schedule (Breakfast, Lunch, Dinner for each day), starting on {target_date}.

CRITICAL COMPLIANCE RULES:
1. INGREDIENT LOCK: Every single meal MUST use at least 3 ingredients from this specific list: [{ingredients}].
2. BUDGET VALIDATION GATE: Each meal must not exceed a 1/3 portion of the daily budget of {daily_budget} INR for a {city_type} economy.
3. EXPLICIT FALLBACKS: If a meal's cost is risky, provide exactly two cheaper options within the 'fallbacks' array of that recipe object.
4. LABELS: Fallbacks MUST be titled "Ultra-Budget Fallback 1" and "Ultra-Budget Fallback 2".
5. DAY-BASED OUTPUT: Organize by Day 1 to Day {days}, with ISO dates.

User Profile:
- Diet: {diet}
- Kitchen: {kitchen}
- Time per meal: {time_available} minutes
{goal_line}{allergy_line}
Output JSON only in the schema provided."#;

const SWAP_PROMPT_TEMPLATE: &str = r#"Generate exactly one replacement {meal_type} recipe for {date}.

CRITICAL COMPLIANCE RULES:
1. INGREDIENT LOCK: The meal MUST use at least 3 ingredients from this specific list: [{ingredients}].
2. BUDGET VALIDATION GATE: The meal must not exceed {meal_budget} INR (one third of the daily budget) for a {city_type} economy.
3. If the cost is risky, provide exactly two cheaper options in the 'fallbacks' array, titled "Ultra-Budget Fallback 1" and "Ultra-Budget Fallback 2".

User Profile:
- Diet: {diet}
- Kitchen: {kitchen}
- Time per meal: {time_available} minutes
{allergy_line}
Output JSON only in the schema provided."#;

const GROCERY_PROMPT_TEMPLATE: &str = r#"Build one consolidated grocery list for these planned recipes:
{recipe_lines}

Group items into categories, with quantity and estimated cost per item, plus a total. Provide city-adjusted INR costs for a {city_type} economy. Output JSON only in the schema provided."#;

const AUDIT_PROMPT_TEMPLATE: &str = r#"Audit the following generated cooking schedule for compliance and culinary quality.

Schedule JSON:
{schedule_json}

Constraints it was generated under:
- Ingredient list: [{ingredients}]
- Daily budget: {daily_budget} INR for a {city_type} economy (each meal at most one third)
- Diet: {diet}

Score the schedule 0-100 for culinary quality, write a short report, and declare it COMPLIANT or NON_COMPLIANT against the constraints. Output JSON only in the schema provided."#;

const DISCOVER_PROMPT_TEMPLATE: &str = r#"Discover 4 creative and budget-friendly recipes using these ingredients: {ingredients}.
Adjust costs for a {city_type} economy. Provide full recipe details for each, as the 'recipes' array of the schema. Output JSON only."#;

use std::future::Future;
use std::time::{Duration, Instant};

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use chefsync_core::domain::{
    CityType, CookingInput, CookingPlan, DailySchedule, GroceryList, MealType, RecipeOption,
    ScheduleAudit,
};
use chefsync_core::ports::{PortError, PortResult, RecipeGenerationService};

use crate::analytics;

/// Transient-failure budget: two retries, so three attempts total.
const MAX_RETRIES: u32 = 2;
const RETRY_PAUSE: Duration = Duration::from_secs(1);

//=========================================================================================
// Retry Helper
//=========================================================================================

/// Runs `attempt` until it succeeds or the retry budget is exhausted, with a
/// fixed pause between sequential attempts. Parsing happens inside the
/// attempt, so a schema-violating payload is retried like a busy service.
pub(crate) async fn with_retry<T, F, Fut>(label: &str, mut attempt: F) -> PortResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PortResult<T>>,
{
    let mut retries_left = MAX_RETRIES;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if retries_left > 0 => {
                warn!(%err, retries_left, label, "generation service busy, retrying");
                retries_left -= 1;
                tokio::time::sleep(RETRY_PAUSE).await;
            }
            Err(err) => return Err(err),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `RecipeGenerationService` against an
/// OpenAI-compatible LLM endpoint.
#[derive(Clone)]
pub struct GeminiRecipeAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl GeminiRecipeAdapter {
    /// Creates a new `GeminiRecipeAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    /// One schema-constrained completion: sends the prompt, bounds the call
    /// with the configured timeout, and returns the raw JSON text.
    async fn complete_json(
        &self,
        prompt: String,
        schema_name: &str,
        schema: Value,
    ) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: schema_name.to_string(),
                    schema: Some(schema),
                    strict: Some(false),
                },
            })
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| PortError::Generation("generation request timed out".to_string()))?
            .map_err(|e: OpenAIError| PortError::Generation(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                PortError::Generation("generation response contained no text content".to_string())
            })
    }
}

/// Strictly deserializes a response body into a domain shape.
fn parse<T: DeserializeOwned>(what: &str, text: &str) -> PortResult<T> {
    serde_json::from_str(text)
        .map_err(|e| PortError::Generation(format!("malformed {what} response: {e}")))
}

/// The wire spelling of an enum value (`"TIER_2"`, `"NON_VEG"`, ...), for
/// embedding into prompt text.
fn wire<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

//=========================================================================================
// Output Schemas
//=========================================================================================

/// Shared recipe schema part; inlined wherever a recipe appears because the
/// endpoint does not support `$ref`.
fn recipe_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipeName": { "type": "string" },
            "description": { "type": "string" },
            "totalTime": { "type": "string" },
            "ingredientsUsed": { "type": "array", "items": { "type": "string" } },
            "substitutions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "original": { "type": "string" },
                        "replacement": { "type": "string" },
                        "reason": { "type": "string" }
                    },
                    "required": ["original", "replacement", "reason"]
                }
            },
            "prepChecklist": { "type": "array", "items": { "type": "string" } },
            "cookingSequence": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "instruction": { "type": "string" },
                        "timeEstimate": { "type": "string" }
                    },
                    "required": ["instruction"]
                }
            },
            "additionalNotes": { "type": "string" },
            "budgetFeasibility": { "type": "string", "enum": ["Budget Validated", "Budget Risk"] },
            "estimatedCostValue": { "type": "number" },
            "isFallback": { "type": "boolean" },
            "imagePrompt": { "type": "string" },
            "fallbacks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "recipeName": { "type": "string" },
                        "description": { "type": "string" },
                        "totalTime": { "type": "string" },
                        "ingredientsUsed": { "type": "array", "items": { "type": "string" } },
                        "prepChecklist": { "type": "array", "items": { "type": "string" } },
                        "cookingSequence": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "instruction": { "type": "string" },
                                    "timeEstimate": { "type": "string" }
                                },
                                "required": ["instruction"]
                            }
                        },
                        "budgetFeasibility": { "type": "string", "enum": ["Budget Validated", "Budget Risk"] },
                        "estimatedCostValue": { "type": "number" },
                        "isFallback": { "type": "boolean" },
                        "imagePrompt": { "type": "string" }
                    },
                    "required": ["recipeName", "description", "totalTime", "ingredientsUsed",
                                 "prepChecklist", "cookingSequence", "budgetFeasibility",
                                 "estimatedCostValue", "imagePrompt"]
                }
            }
        },
        "required": ["recipeName", "description", "totalTime", "ingredientsUsed",
                     "prepChecklist", "cookingSequence", "budgetFeasibility",
                     "estimatedCostValue", "imagePrompt"]
    })
}

fn schedule_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "days": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string" },
                        "breakfast": recipe_schema(),
                        "lunch": recipe_schema(),
                        "dinner": recipe_schema()
                    },
                    "required": ["date", "breakfast", "lunch", "dinner"]
                }
            }
        },
        "required": ["days"]
    })
}

fn grocery_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "item": { "type": "string" },
                        "quantity": { "type": "string" },
                        "estimatedCost": { "type": "string" },
                        "category": { "type": "string" }
                    },
                    "required": ["item", "quantity", "estimatedCost", "category"]
                }
            },
            "totalEstimatedBudget": { "type": "string" },
            "budgetFeasibilityNote": { "type": "string" }
        },
        "required": ["items", "totalEstimatedBudget"]
    })
}

fn audit_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": { "type": "integer", "minimum": 0, "maximum": 100 },
            "report": { "type": "string" },
            "compliance": { "type": "string", "enum": ["COMPLIANT", "NON_COMPLIANT"] }
        },
        "required": ["score", "report", "compliance"]
    })
}

fn discovery_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipes": { "type": "array", "items": recipe_schema() }
        },
        "required": ["recipes"]
    })
}

/// The endpoint needs an object root, so discovery results arrive wrapped.
#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    recipes: Vec<RecipeOption>,
}

//=========================================================================================
// `RecipeGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecipeGenerationService for GeminiRecipeAdapter {
    async fn generate_schedule(
        &self,
        input: &CookingInput,
        days: u32,
    ) -> PortResult<DailySchedule> {
        let started = Instant::now();

        let goal_line = match input.optimization_goal {
            Some(goal) => format!("- Optimize specifically for {}\n", wire(&goal)),
            None => String::new(),
        };
        let allergy_line = match &input.allergies {
            Some(allergies) => format!("- Strictly exclude these allergens: {allergies}\n"),
            None => String::new(),
        };
        let prompt = SCHEDULE_PROMPT_TEMPLATE
            .replace("{days}", &days.to_string())
            .replace("{target_date}", &input.target_date)
            .replace("{ingredients}", &input.ingredients.join(", "))
            .replace("{daily_budget}", &input.daily_budget.to_string())
            .replace("{city_type}", &wire(&input.city_type))
            .replace("{diet}", &wire(&input.diet))
            .replace("{kitchen}", &wire(&input.kitchen_setup))
            .replace("{time_available}", &input.time_available.to_string())
            .replace("{goal_line}", &goal_line)
            .replace("{allergy_line}", &allergy_line);

        let result = with_retry("generate_schedule", || async {
            let text = self
                .complete_json(prompt.clone(), "daily_schedule", schedule_schema())
                .await?;
            let schedule: DailySchedule = parse("schedule", &text)?;
            if schedule.days.is_empty() {
                return Err(PortError::Generation(
                    "schedule response carried an empty days array".to_string(),
                ));
            }
            Ok(schedule)
        })
        .await;

        analytics::measure("generate_schedule", started, result.is_ok());
        result
    }

    async fn swap_meal(
        &self,
        input: &CookingInput,
        date: &str,
        meal_type: MealType,
    ) -> PortResult<RecipeOption> {
        let started = Instant::now();

        let allergy_line = match &input.allergies {
            Some(allergies) => format!("- Strictly exclude these allergens: {allergies}\n"),
            None => String::new(),
        };
        // One slot's share of the day's budget.
        let meal_budget = input.daily_budget / 3;
        let prompt = SWAP_PROMPT_TEMPLATE
            .replace("{meal_type}", meal_type.label())
            .replace("{date}", date)
            .replace("{ingredients}", &input.ingredients.join(", "))
            .replace("{meal_budget}", &meal_budget.to_string())
            .replace("{city_type}", &wire(&input.city_type))
            .replace("{diet}", &wire(&input.diet))
            .replace("{kitchen}", &wire(&input.kitchen_setup))
            .replace("{time_available}", &input.time_available.to_string())
            .replace("{allergy_line}", &allergy_line);

        let result = with_retry("swap_meal", || async {
            let text = self
                .complete_json(prompt.clone(), "recipe_option", recipe_schema())
                .await?;
            parse("recipe", &text)
        })
        .await;

        analytics::measure("swap_meal", started, result.is_ok());
        result
    }

    async fn generate_grocery_list(&self, plans: &[CookingPlan]) -> PortResult<GroceryList> {
        let started = Instant::now();

        let recipe_lines = plans
            .iter()
            .map(|plan| format!("{}: {}", plan.recipe_name, plan.ingredients_used.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");
        // Single-tier assumption: the caller has already validated the set.
        let city_type = plans
            .first()
            .map(|plan| plan.metadata.city_type)
            .unwrap_or(CityType::Metro);
        let prompt = GROCERY_PROMPT_TEMPLATE
            .replace("{recipe_lines}", &recipe_lines)
            .replace("{city_type}", &wire(&city_type));

        let result = with_retry("generate_grocery_list", || async {
            let text = self
                .complete_json(prompt.clone(), "grocery_list", grocery_schema())
                .await?;
            parse("grocery list", &text)
        })
        .await;

        analytics::measure("generate_grocery_list", started, result.is_ok());
        result
    }

    async fn audit_schedule(
        &self,
        schedule: &DailySchedule,
        input: &CookingInput,
    ) -> PortResult<ScheduleAudit> {
        let started = Instant::now();

        let schedule_json = serde_json::to_string(schedule)
            .map_err(|e| PortError::Unexpected(format!("schedule not serializable: {e}")))?;
        let prompt = AUDIT_PROMPT_TEMPLATE
            .replace("{schedule_json}", &schedule_json)
            .replace("{ingredients}", &input.ingredients.join(", "))
            .replace("{daily_budget}", &input.daily_budget.to_string())
            .replace("{city_type}", &wire(&input.city_type))
            .replace("{diet}", &wire(&input.diet));

        let result = with_retry("audit_schedule", || async {
            let text = self
                .complete_json(prompt.clone(), "schedule_audit", audit_schema())
                .await?;
            parse("audit", &text)
        })
        .await;

        analytics::measure("audit_schedule", started, result.is_ok());
        result
    }

    async fn discover_recipes(
        &self,
        ingredients: &[String],
        city_type: CityType,
    ) -> PortResult<Vec<RecipeOption>> {
        let started = Instant::now();

        let prompt = DISCOVER_PROMPT_TEMPLATE
            .replace("{ingredients}", &ingredients.join(", "))
            .replace("{city_type}", &wire(&city_type));

        let result = with_retry("discover_recipes", || async {
            let text = self
                .complete_json(prompt.clone(), "recipe_discovery", discovery_schema())
                .await?;
            let response: DiscoveryResponse = parse("discovery", &text)?;
            Ok(response.recipes)
        })
        .await;

        analytics::measure("discover_recipes", started, result.is_ok());
        result
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retry_succeeds_on_the_third_attempt() {
        let attempts = AtomicU32::new(0);
        let result = with_retry("test", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(PortError::Generation("busy".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_budget_is_two_retries() {
        let attempts = AtomicU32::new(0);
        let result: PortResult<()> = with_retry("test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(PortError::Generation("still busy".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(PortError::Generation(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_returns_immediately() {
        let attempts = AtomicU32::new(0);
        let result = with_retry("test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Ok(42u32) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn wire_spelling_matches_the_contract() {
        assert_eq!(wire(&CityType::Tier2), "TIER_2");
        assert_eq!(wire(&chefsync_core::domain::DietType::NonVeg), "NON_VEG");
    }

    #[test]
    fn recipe_schema_lists_every_required_field() {
        let schema = recipe_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "recipeName",
            "description",
            "totalTime",
            "ingredientsUsed",
            "prepChecklist",
            "cookingSequence",
            "budgetFeasibility",
            "estimatedCostValue",
            "imagePrompt",
        ] {
            assert!(required.contains(&field), "missing {field}");
        }
    }

    #[test]
    fn malformed_payload_is_rejected_not_repaired() {
        let err = parse::<DailySchedule>("schedule", "{\"schedule\": []}").unwrap_err();
        assert!(matches!(err, PortError::Generation(_)));
    }
}
