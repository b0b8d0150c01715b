pub mod config;
pub mod deck;
pub mod error;
pub mod llm;
pub mod models;
pub mod workflow;
