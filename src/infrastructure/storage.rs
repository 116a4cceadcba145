use crate::domain::error::{AppError, Result};
use crate::domain::figure::Figure;
use crate::domain::profile::UserProfile;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RAW_RESPONSE_FILE: &str = "claude_response.json";
pub const STRUCTURED_RESPONSE_FILE: &str = "claude_structured_response.json";
pub const DAILY_STRUCTURED_RESPONSE_FILE: &str = "claude_daily_structured_response.json";
pub const FIGURES_DIR: &str = "figures";

/// Fixed-name artifacts under one output directory. Every save overwrites.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_response_path(&self) -> PathBuf {
        self.root.join(RAW_RESPONSE_FILE)
    }

    /// Raw reply stored as a JSON string literal
    pub fn save_raw_response(&self, reply: &str) -> Result<PathBuf> {
        let path = self.raw_response_path();
        write_file(&path, serde_json::to_string(reply)?.as_bytes())?;
        info!(path = %path.display(), "Saved raw response");
        Ok(path)
    }

    pub fn load_raw_response(&self) -> Result<String> {
        let path = self.raw_response_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::NotFound(format!("{}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_structured<T: Serialize>(&self, value: &T) -> Result<PathBuf> {
        self.save_pretty_json(STRUCTURED_RESPONSE_FILE, value)
    }

    pub fn save_daily_structured<T: Serialize>(&self, value: &T) -> Result<PathBuf> {
        self.save_pretty_json(DAILY_STRUCTURED_RESPONSE_FILE, value)
    }

    pub fn save_figure(&self, figure: &Figure) -> Result<PathBuf> {
        let file_name = format!("{}.json", figure.dataset_name);
        let path = self.root.join(FIGURES_DIR).join(file_name);
        write_file(&path, serde_json::to_string_pretty(figure)?.as_bytes())?;
        Ok(path)
    }

    pub fn save_advice_markdown(&self, profile: &UserProfile, advice: &str) -> Result<PathBuf> {
        self.save_advice_markdown_at(profile, advice, Local::now().naive_local())
    }

    pub fn save_daily_markdown(&self, profile: &UserProfile, advice: &str) -> Result<PathBuf> {
        self.save_daily_markdown_at(profile, advice, Local::now().naive_local())
    }

    pub fn save_advice_markdown_at(
        &self,
        profile: &UserProfile,
        advice: &str,
        at: NaiveDateTime,
    ) -> Result<PathBuf> {
        let header = format!("# Health Advice for {}", profile.display_name());
        self.save_markdown("health_advice", &header, profile, advice, at)
    }

    pub fn save_daily_markdown_at(
        &self,
        profile: &UserProfile,
        advice: &str,
        at: NaiveDateTime,
    ) -> Result<PathBuf> {
        let header = format!("# Daily Health Advice for {}", profile.display_name());
        self.save_markdown("daily_advice", &header, profile, advice, at)
    }

    fn save_markdown(
        &self,
        prefix: &str,
        header: &str,
        profile: &UserProfile,
        advice: &str,
        at: NaiveDateTime,
    ) -> Result<PathBuf> {
        let file_name = format!(
            "{}_{}_{}.md",
            prefix,
            profile.file_slug(),
            at.format("%Y%m%d_%H%M%S")
        );
        let content = format!(
            "{}\nGenerated on: {}\n\n{}",
            header,
            at.format("%Y-%m-%d %H:%M:%S"),
            advice
        );

        let path = self.root.join(file_name);
        write_file(&path, content.as_bytes())?;
        info!(path = %path.display(), "Saved advice");
        Ok(path)
    }

    fn save_pretty_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let path = self.root.join(file_name);
        write_file(&path, serde_json::to_string_pretty(value)?.as_bytes())?;
        info!(path = %path.display(), "Saved structured response");
        Ok(path)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            AppError::IoError(format!("Failed to create dir {}: {}", path.display(), e))
        })?;
    }
    Ok(())
}

/// Write through a sibling temp file so readers never see a half-written artifact
fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes).map_err(|e| {
        AppError::IoError(format!("Failed to write {}: {}", tmp_path.display(), e))
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        AppError::IoError(format!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        ))
    })
}
