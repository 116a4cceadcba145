// Use case layer: analysis, prompt composition, and advice generation

pub mod advice;
pub mod advice_prompts;
pub mod dataset_analyzer;
