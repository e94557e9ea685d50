pub mod animation;
pub mod availability;
pub mod calendar;
pub mod categories;
pub mod config;
mod config_env;
pub mod llm;
pub mod recommendation;
pub mod session;
