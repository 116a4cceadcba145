pub mod advice;
pub mod dictionary;
pub mod error;
pub mod figure;
pub mod llm_config;
pub mod profile;
pub mod statistics;

// Loaded dataset types
pub mod csv;
