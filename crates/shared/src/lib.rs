pub mod config;
mod config_env;
pub mod conversation;
pub mod conversation_store;
pub mod llm;
pub mod models;
