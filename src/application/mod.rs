pub mod use_cases;

pub use use_cases::advice::AdviceUseCase;
pub use use_cases::dataset_analyzer::{DataQualitySummary, HealthAnalysis};
