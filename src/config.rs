use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: Model,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub retry: Retry,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// Inline key wins; otherwise fall back to the configured environment
    /// variable. A missing key is a fatal setup error.
    pub fn resolve_api_key(&self) -> Result<String> {
        if !self.model.api_key.is_empty() {
            return Ok(self.model.api_key.clone());
        }
        std::env::var(&self.model.api_key_env).map_err(|_| {
            anyhow!(
                "no API key: set model.api_key in the config or export {}",
                self.model.api_key_env
            )
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Default::default(),
            paths: Default::default(),
            retry: Default::default(),
            options: Default::default(),
            logging: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub api_key: String,
    pub api_key_env: String,
    pub endpoint: String,
    pub request_timeout_seconds: u64,
}
impl Default for Model {
    fn default() -> Self {
        Self {
            name: "gemini-2.5-flash".into(),
            api_key: "".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            request_timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub pdf_dir: String,
    pub questions_file: String,
    pub output_file: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            pdf_dir: "pdfs".into(),
            questions_file: "questions.toml".into(),
            output_file: "extraction.md".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retry {
    /// Additional attempts after the first, for transient gateway failures only.
    pub max_retries: u32,
    pub delay_ms: u64,
}
impl Default for Retry {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    pub confirm_before_processing: bool,
    pub resume: bool,
}
impl Default for Options {
    fn default() -> Self {
        Self {
            confirm_before_processing: true,
            resume: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
