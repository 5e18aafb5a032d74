//! Macro Planner MCP Server Implementation
//!
//! Exposes the planner tools over MCP.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::Nutrients;
use crate::tools::status::StatusTracker;
use crate::tools::{diary, reports, settings};

/// Macro Planner MCP Service
#[derive(Clone)]
pub struct PlannerService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<PlannerService>,
}

impl PlannerService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        let tracker = StatusTracker::new(database_path).with_database(database.clone());
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Settings Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSettingsParams {
    /// Body weight in the active unit system (kg for metric, lb for imperial)
    pub weight: Option<f64>,
    /// Daily calorie goal before per-day adjustment
    pub base_goal_calories: Option<f64>,
    /// Hours between meals
    pub meal_interval: Option<f64>,
    /// "metric" or "imperial"
    pub unit_system: Option<String>,
}

// ============================================================================
// Day Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DayParams {
    /// Day key: sunday, monday, tuesday, wednesday, thursday, friday, saturday
    pub day: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct OptionalDayParams {
    /// Day key (defaults to today's weekday)
    pub day: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetMacroConfigParams {
    /// Day key
    pub day: String,
    /// Protein grams per kg body weight (omit for no protein target)
    pub protein_level: Option<f64>,
    /// Fat grams per kg body weight (omit for no fat target)
    pub fat_level: Option<f64>,
    /// Calories added to (or subtracted from) the base goal for this day
    pub calorie_adjustment: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetMealTimeParams {
    /// Day key
    pub day: String,
    /// Meal id 1-6. Meal 1 reschedules meals 2-6.
    pub meal_id: i64,
    /// New time, HH:MM (24h)
    pub time: String,
}

// ============================================================================
// Food Item Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodItemParams {
    /// Day key
    pub day: String,
    /// Meal id 1-6
    pub meal_id: i64,
    pub name: String,
    /// Serving the nutrient values below correspond to (g, or lb when imperial)
    pub base_amount: f64,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    /// Protein grams from the food database's separate protein column
    pub protein_g: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodAmountParams {
    pub day: String,
    pub meal_id: i64,
    pub item_id: i64,
    /// New serving amount (g, or lb when imperial)
    pub amount: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenameFoodItemParams {
    pub day: String,
    pub meal_id: i64,
    pub item_id: i64,
    /// New name; an empty name removes the item
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodItemParams {
    pub day: String,
    pub meal_id: i64,
    pub item_id: i64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl PlannerService {
    // --- Status ---

    #[tool(description = "Get the current status of the planner service including build info, database status, and process information")]
    async fn planner_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for setting macro targets, logging food, scheduling meals and reading reports. Call this first when unsure how to use the planner tools.")]
    fn planner_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PLANNER_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PLANNER_INSTRUCTIONS)]))
    }

    // --- Settings ---

    #[tool(description = "Get body weight, base calorie goal, meal interval and unit system")]
    fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let result = settings::get_settings(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update settings. Only the fields provided are changed. Weight is in the active unit system.")]
    fn update_settings(&self, Parameters(p): Parameters<UpdateSettingsParams>) -> Result<CallToolResult, McpError> {
        let result = settings::update_settings(
            &self.database, p.weight, p.base_goal_calories, p.meal_interval, p.unit_system.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Days ---

    #[tool(description = "Get a day's macro config and its six meals with food items")]
    fn get_day_plan(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_day_plan(&self.database, &p.day).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Set a day's protein and fat levels (g per kg body weight) and calorie adjustment")]
    fn set_macro_config(&self, Parameters(p): Parameters<SetMacroConfigParams>) -> Result<CallToolResult, McpError> {
        let result = diary::set_macro_config(&self.database, &p.day, p.protein_level, p.fat_level, p.calorie_adjustment)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Set a meal's time. Setting meal 1 reschedules meals 2-6 using the meal interval, wrapping past midnight.")]
    fn set_meal_time(&self, Parameters(p): Parameters<SetMealTimeParams>) -> Result<CallToolResult, McpError> {
        let result = diary::set_meal_time(&self.database, &p.day, p.meal_id, &p.time)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Food Items ---

    #[tool(description = "Add a food item to a meal with its nutrient values at base_amount")]
    fn add_food_item(&self, Parameters(p): Parameters<AddFoodItemParams>) -> Result<CallToolResult, McpError> {
        let base = Nutrients {
            calories: p.calories, carbs: p.carbs, protein: p.protein, fat: p.fat, protein_g: p.protein_g,
        };
        let result = diary::add_food_item(&self.database, &p.day, p.meal_id, &p.name, p.base_amount, base)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Change a food item's serving amount; nutrient values are rescaled proportionally")]
    fn update_food_amount(&self, Parameters(p): Parameters<UpdateFoodAmountParams>) -> Result<CallToolResult, McpError> {
        let result = diary::update_food_amount(&self.database, &p.day, p.meal_id, p.item_id, p.amount)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Rename a food item. An empty name removes it from the meal.")]
    fn rename_food_item(&self, Parameters(p): Parameters<RenameFoodItemParams>) -> Result<CallToolResult, McpError> {
        let result = diary::rename_food_item(&self.database, &p.day, p.meal_id, p.item_id, &p.name)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(resp) => to_json(&resp),
            None => to_json(&serde_json::json!({ "success": true, "deleted_id": p.item_id })),
        }
    }

    #[tool(description = "Remove a food item from a meal")]
    fn delete_food_item(&self, Parameters(p): Parameters<DeleteFoodItemParams>) -> Result<CallToolResult, McpError> {
        let result = diary::delete_food_item(&self.database, &p.day, p.meal_id, p.item_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Reports ---

    #[tool(description = "Get calorie, protein, fat and carb targets for a day (defaults to today)")]
    fn get_day_targets(&self, Parameters(p): Parameters<OptionalDayParams>) -> Result<CallToolResult, McpError> {
        let result = reports::get_day_targets(&self.database, p.day.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a day's totals against targets with achievement tiers (defaults to today)")]
    fn get_day_report(&self, Parameters(p): Parameters<OptionalDayParams>) -> Result<CallToolResult, McpError> {
        let result = reports::get_day_report(&self.database, p.day.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the weekly report: seven day reports plus weekly averages, achievement percentages and days on track")]
    fn get_week_report(&self) -> Result<CallToolResult, McpError> {
        let result = reports::get_week_report(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PlannerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macroplan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Macro Planner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Macro Planner - weekly macro targets, meal schedule and achievement reports. \
                 IMPORTANT: Call planner_instructions first. \
                 Settings: get_settings/update_settings. \
                 Days: get_day_plan, set_macro_config, set_meal_time. \
                 Food: add_food_item, update_food_amount, rename_food_item, delete_food_item. \
                 Reports: get_day_targets, get_day_report, get_week_report."
                    .into(),
            ),
        }
    }
}
