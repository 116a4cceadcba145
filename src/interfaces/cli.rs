use crate::application::use_cases::advice_prompts::{
    build_advice_prompt, build_stats_summary, build_structured_advice_prompt,
    WOMENS_HEALTH_RESEARCH,
};
use crate::application::{AdviceUseCase, DataQualitySummary, HealthAnalysis};
use crate::domain::advice::LlmJson;
use crate::domain::dictionary::DataDictionary;
use crate::domain::error::Result;
use crate::domain::profile::UserProfile;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::DatasetLoader;
use crate::infrastructure::dictionary::load_dictionary;
use crate::infrastructure::llm_clients::{AnthropicClient, LLMClient};
use crate::infrastructure::storage::ArtifactStore;
use crate::shared::token_counter::TokenCounter;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Analyze wearable health exports and generate personalized advice
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the CSV exports
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory advice and figure artifacts are written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// TOML config file (defaults to ./aurient.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Name the advice is addressed to
    #[arg(long, global = true)]
    pub name: Option<String>,

    #[arg(long, global = true)]
    pub age: Option<u32>,

    #[arg(long, global = true)]
    pub goals: Option<String>,

    /// Focus area; repeat for several
    #[arg(long = "focus", global = true)]
    pub focus_areas: Vec<String>,

    #[arg(long, global = true)]
    pub activity_level: Option<String>,
}

impl ProfileArgs {
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            age: self.age,
            goals: self.goals.clone(),
            activity_level: self.activity_level.clone(),
            focus_areas: self.focus_areas.clone(),
            ..UserProfile::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and analyze every dataset, export figure files
    Analyze {
        /// Also print details for one dataset
        #[arg(long)]
        dataset: Option<String>,
    },

    /// Print the advice prompt without calling the model
    Prompt {
        #[arg(long)]
        structured: bool,
    },

    /// Generate personalized advice
    Advice {
        /// Ask for JSON sections instead of markdown
        #[arg(long)]
        structured: bool,
    },

    /// Generate daily programs from the last saved advice
    Daily {
        /// Ask for JSON program cards instead of markdown
        #[arg(long)]
        structured: bool,
    },
}

/// Everything a command needs, built once from config and flags
struct Session {
    config: AppConfig,
    profile: UserProfile,
    dictionary: DataDictionary,
    store: ArtifactStore,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }

        let profile = self.profile.to_profile();
        profile.validate()?;

        let session = Session {
            dictionary: load_dictionary(config.dictionary_path.as_deref()),
            store: ArtifactStore::new(config.output_dir.clone()),
            profile,
            config,
        };

        match self.command {
            Commands::Analyze { dataset } => session.analyze(dataset.as_deref()),
            Commands::Prompt { structured } => session.print_prompt(structured),
            Commands::Advice { structured } => session.advice(structured).await,
            Commands::Daily { structured } => session.daily(structured).await,
        }
        Ok(())
    }
}

impl Session {
    fn load_analysis(&self) -> HealthAnalysis {
        let (datasets, report) = DatasetLoader::new().load_dir(&self.config.data_dir);
        if !report.failed().is_empty() {
            for (file, reason) in report.failed() {
                warn!(file = %file, reason = %reason, "Skipped dataset");
            }
        }
        info!(
            loaded = report.loaded_count(),
            missing = report.missing().len(),
            "Health data loaded"
        );

        let mut analysis = HealthAnalysis::new(datasets);
        analysis.analyze_all();
        analysis
    }

    fn advice_use_case(&self) -> AdviceUseCase {
        let client: Option<Arc<dyn LLMClient + Send + Sync>> =
            if self.config.llm.has_credential() {
                Some(Arc::new(AnthropicClient::new()))
            } else {
                None
            };

        AdviceUseCase::new(
            client,
            self.config.llm.clone(),
            self.config.daily_max_tokens,
            self.dictionary.clone(),
            self.store.clone(),
        )
    }

    fn print_profile(&self) {
        println!("\nUSER PROFILE");
        println!("{}", "-".repeat(40));
        for (label, value) in self.profile.describe() {
            println!("{}: {}", label, value);
        }
    }

    fn analyze(&self, dataset: Option<&str>) {
        self.print_profile();
        let analysis = self.load_analysis();

        println!("\nAVAILABLE DATASETS");
        println!("{}", "-".repeat(40));
        let listing = analysis.list_datasets();
        if listing.is_empty() {
            println!("No datasets loaded.");
        }
        for entry in listing {
            println!("  {}: {} rows, {} columns", entry.name, entry.rows, entry.columns);
        }

        if let Some(name) = dataset {
            println!();
            match analysis.dataset_info(name, &self.dictionary) {
                Ok(info) => print!("{}", info),
                Err(err) => println!("{}", err),
            }
        }

        println!("\nKEY STATISTICS SUMMARY");
        println!("{}", "-".repeat(40));
        match build_stats_summary(analysis.statistics()) {
            Ok(summary) => print!("{}", summary),
            Err(err) => println!("{}", err),
        }

        let mut exported = 0;
        for figure in analysis.figures() {
            match self.store.save_figure(figure) {
                Ok(_) => exported += 1,
                Err(err) => warn!(figure = %figure.dataset_name, error = %err, "Could not save figure"),
            }
        }
        info!(exported, "Figure files written");

        print_quality(&DataQualitySummary::from_statistics(analysis.statistics()));
    }

    fn print_prompt(&self, structured: bool) {
        let analysis = self.load_analysis();
        let prompt = if structured {
            build_structured_advice_prompt(
                &self.profile,
                &self.dictionary,
                analysis.statistics(),
                WOMENS_HEALTH_RESEARCH,
            )
        } else {
            build_advice_prompt(
                &self.profile,
                &self.dictionary,
                analysis.statistics(),
                WOMENS_HEALTH_RESEARCH,
            )
        };

        match prompt {
            Ok(prompt) => {
                info!(
                    estimated_tokens = TokenCounter::estimate_tokens(&prompt),
                    "Prompt composed"
                );
                println!("{}", prompt);
            }
            Err(err) => println!("{}", err),
        }
    }

    async fn advice(&self, structured: bool) {
        let analysis = self.load_analysis();
        let advice = self.advice_use_case();

        println!("Generating personalized health advice...");
        println!("{}", "=".repeat(60));
        if structured {
            let result = advice
                .generate_structured_advice(&self.profile, analysis.statistics())
                .await;
            print_json_outcome(result);
        } else {
            match advice
                .generate_advice(&self.profile, analysis.statistics())
                .await
            {
                Ok(text) => println!("{}", text),
                Err(err) => println!("{}", err),
            }
        }
    }

    async fn daily(&self, structured: bool) {
        let prior_advice = match self.store.load_raw_response() {
            Ok(prior) => prior,
            Err(err) => {
                warn!(error = %err, "Failed to load previous response");
                String::new()
            }
        };
        let advice = self.advice_use_case();

        println!("Generating daily advice...");
        if structured {
            let result = advice
                .generate_daily_programs(&self.profile, &prior_advice)
                .await;
            print_json_outcome(result);
        } else {
            match advice
                .generate_daily_advice(&self.profile, &prior_advice)
                .await
            {
                Ok(text) => println!("{}", text),
                Err(err) => println!("{}", err),
            }
        }
    }
}

fn print_json_outcome<T: Serialize>(result: Result<LlmJson<T>>) {
    match result {
        Ok(LlmJson::Parsed(value)) => match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("{}", err),
        },
        Ok(LlmJson::RawText { raw, reason }) => {
            println!("{}", reason);
            println!("{}", raw);
        }
        Err(err) => println!("{}", err),
    }
}

fn print_quality(quality: &DataQualitySummary) {
    println!("\nDATA QUALITY SUMMARY");
    println!("{}", "-".repeat(40));
    println!("Total Datasets: {}", quality.total_datasets);
    println!("Total Records: {}", quality.total_records);

    println!("\nComplete datasets ({}):", quality.complete.len());
    for dataset in &quality.complete {
        println!("  {}", dataset);
    }
    if !quality.incomplete.is_empty() {
        println!("\nDatasets with missing values ({}):", quality.incomplete.len());
        for (dataset, missing) in &quality.incomplete {
            println!("  {}: {} missing values", dataset, missing);
        }
    }
}
