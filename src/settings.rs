use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://oncodb.org";
pub const DEFAULT_SEARCH_PATH: &str = "/cgi-bin/clinical_nonvirus_search.cgi";
pub const DEFAULT_OUTPUT: &str = "output.xlsx";
pub const DEFAULT_MAX_PROFILES: usize = 10;
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36";

/// Run settings. Defaults select HNSC clinical-stage expression data.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub search_path: String,
    pub cancer_select: String,
    pub stage_select: String,
    pub sig_filter: String,
    pub by_option: String,
    pub data_option: String,
    pub max_profiles: usize,
    pub output: PathBuf,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.into(),
            search_path: DEFAULT_SEARCH_PATH.into(),
            cancer_select: "HNSC".into(),
            stage_select: "cstage".into(),
            sig_filter: "0.5".into(),
            by_option: "Anova".into(),
            data_option: "expression".into(),
            max_profiles: DEFAULT_MAX_PROFILES,
            output: PathBuf::from(DEFAULT_OUTPUT),
            user_agent: USER_AGENT.into(),
        }
    }
}

impl Settings {
    /// Layer an optional config file and `ONCODB_*` env vars over the defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("ONCODB"))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;
        Ok(settings)
    }

    /// Substring a search-page link must contain to be a profile link.
    pub fn profile_marker(&self) -> String {
        format!(
            "&stageSelect={}&dataOption_clinical={}",
            self.stage_select, self.data_option
        )
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.search_path)
    }
}
