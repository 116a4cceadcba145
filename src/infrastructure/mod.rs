pub mod config;
pub mod csv;
pub mod dictionary;
pub mod llm_clients;
pub mod response;
pub mod storage;
