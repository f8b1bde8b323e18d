pub mod api;
pub mod db;
pub mod llm;
pub mod models;
pub mod tags;
