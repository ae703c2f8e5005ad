use crate::pipeline::RunSummary;
use crate::util::now_rfc3339;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The outcome of one (document, question) invocation. For failed questions
/// `text` carries the error message instead of an answer.
#[derive(Debug, Clone)]
pub struct Answer {
    pub question: String,
    pub text: String,
    pub ok: bool,
}

impl Answer {
    pub fn success(question: &str, text: String) -> Self {
        Self {
            question: question.to_string(),
            text,
            ok: true,
        }
    }

    pub fn failure(question: &str, error: String) -> Self {
        Self {
            question: question.to_string(),
            text: error,
            ok: false,
        }
    }
}

/// All answers for one document, in question order. Immutable once handed to
/// the writer.
#[derive(Debug, Clone)]
pub struct DocumentResult {
    pub title: String,
    pub processed_at: String,
    pub answers: Vec<Answer>,
}

/// Incremental markdown writer. Each document section is appended as soon as
/// its questions are attempted, so a crash mid-run leaves every previously
/// written section intact. Existing sections are indexed by title on open,
/// which is what resume keys on (exact string match; titles that differ only
/// in whitespace inside the heading line are treated as distinct).
pub struct ReportWriter {
    path: PathBuf,
    existing: BTreeSet<String>,
}

impl ReportWriter {
    pub fn open(path: &Path, model_id: &str, document_count: usize) -> Result<Self> {
        let existing = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading existing report: {}", path.display()))?;
            let titles = section_titles(&raw);
            info!(
                "report {} already has {} section(s)",
                path.display(),
                titles.len()
            );
            titles
        } else {
            let header = format!(
                "# Extraction Results\n\nGenerated on: {}\nModel: {}\nDocuments: {}\n\n---\n",
                now_rfc3339(),
                model_id,
                document_count
            );
            std::fs::write(path, header)
                .with_context(|| format!("creating report: {}", path.display()))?;
            BTreeSet::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            existing,
        })
    }

    pub fn has_section(&self, title: &str) -> bool {
        self.existing.contains(title)
    }

    pub fn append(&mut self, result: &DocumentResult) -> Result<()> {
        let section = render_section(result);
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening report for append: {}", self.path.display()))?;
        file.write_all(section.as_bytes())
            .with_context(|| format!("appending to report: {}", self.path.display()))?;
        file.flush()
            .with_context(|| format!("flushing report: {}", self.path.display()))?;
        debug!("appended section for {}", result.title);
        self.existing.insert(result.title.clone());
        Ok(())
    }

    pub fn finalize(&self, summary: &RunSummary) -> Result<()> {
        info!(
            "report finalized path={} sections={} questions_failed={}",
            self.path.display(),
            self.existing.len(),
            summary.questions_failed
        );
        Ok(())
    }
}

fn section_titles(raw: &str) -> BTreeSet<String> {
    raw.lines()
        .filter_map(|l| l.strip_prefix("## "))
        .map(|t| t.to_string())
        .collect()
}

fn render_section(result: &DocumentResult) -> String {
    let mut out = format!("\n## {}\n\n", result.title);
    out.push_str(&format!("*Processed on: {}*\n\n", result.processed_at));

    for answer in &result.answers {
        out.push_str(&format!("\u{2022} **{}**\n\n", answer.question));
        let body = if answer.ok {
            answer.text.clone()
        } else {
            format!("Extraction failed: {}", answer.text)
        };
        for line in body.lines() {
            out.push_str("> ");
            out.push_str(line);
            out.push('\n');
        }
        if body.is_empty() {
            out.push_str(">\n");
        }
        out.push('\n');
    }
    out
}
