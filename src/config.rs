use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "codenames-spymaster";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub word_list: Option<PathBuf>,
    #[serde(default = "default_embedding")]
    pub embedding: PathBuf,
    /// Seed for board generation. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    #[serde(default = "default_board_size")]
    pub size: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub expert: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_num_search")]
    pub num_search: usize,
    /// Extra similarity gap required between a clue and any veto word.
    #[serde(default = "default_veto_margin")]
    pub veto_margin: f32,
    #[serde(default = "default_degenerate_words")]
    pub degenerate_words: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    #[serde(default = "default_gamma")]
    pub gamma: f32,
    /// Opponent word count at or below which "unlimited" becomes an option.
    #[serde(default = "default_unlimited_threshold")]
    pub unlimited_threshold: usize,
    #[serde(default = "default_show_top")]
    pub show_top: usize,
    /// Worker threads for subset evaluation. Rayon's default when absent.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_embedding() -> PathBuf {
    PathBuf::from("word2vec.txt")
}

fn default_board_size() -> usize {
    5
}

fn default_num_search() -> usize {
    100
}

fn default_veto_margin() -> f32 {
    0.2
}

fn default_degenerate_words() -> Vec<String> {
    vec!["march".to_string()]
}

fn default_gamma() -> f32 {
    1.0
}

fn default_unlimited_threshold() -> usize {
    2
}

fn default_show_top() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_list: None,
            embedding: default_embedding(),
            seed: None,
            board: BoardConfig::default(),
            rules: RulesConfig::default(),
            search: SearchConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: default_board_size(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_search: default_num_search(),
            veto_margin: default_veto_margin(),
            degenerate_words: default_degenerate_words(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            unlimited_threshold: default_unlimited_threshold(),
            show_top: default_show_top(),
            threads: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration: an explicit path wins, then the per-user
    /// config directory, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                log::info!("Using configuration from {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.size < 2 {
            return Err(ConfigError::Invalid(format!(
                "board.size must be at least 2, got {}",
                self.board.size
            )));
        }
        if self.search.num_search == 0 {
            return Err(ConfigError::Invalid(
                "search.num_search must be positive".to_string(),
            ));
        }
        if !(self.search.veto_margin >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "search.veto_margin must be non-negative, got {}",
                self.search.veto_margin
            )));
        }
        if !(self.planner.gamma >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "planner.gamma must be non-negative, got {}",
                self.planner.gamma
            )));
        }
        if self.planner.threads == Some(0) {
            return Err(ConfigError::Invalid(
                "planner.threads must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
