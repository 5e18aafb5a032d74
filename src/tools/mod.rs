//! Planner Tools module
//!
//! Tool implementations behind the MCP server.

pub mod diary;
pub mod reports;
pub mod settings;
pub mod status;
