use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

/// The ordered question list plus optional instructions appended to every
/// model invocation. Question order is positional and determines the order
/// of answers in the report, so it must stay stable across runs for resume.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<String>,
    #[serde(default)]
    pub additional_instructions: Option<String>,
}

impl QuestionSet {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading questions: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing questions: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let set: QuestionSet = toml::from_str(raw).with_context(|| "parsing TOML")?;
        if set.questions.is_empty() {
            bail!("question list is empty");
        }
        if set.questions.iter().any(|q| q.trim().is_empty()) {
            bail!("question list contains a blank entry");
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn instructions(&self) -> Option<&str> {
        self.additional_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
