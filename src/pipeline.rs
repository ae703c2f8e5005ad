use crate::{
    config::Config,
    gateway::{Gateway, GatewayError},
    questions::QuestionSet,
    report::{Answer, DocumentResult, ReportWriter},
    source::{self, Document, DocumentContent},
    util::{format_duration, now_rfc3339},
};
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub struct Pipeline<G: Gateway> {
    cfg: Config,
    gateway: G,
}

/// Aggregate counters for one run. `questions_failed` equals the number of
/// `ok == false` answers across all emitted sections.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub documents_attempted: usize,
    pub documents_succeeded: usize,
    pub documents_skipped: usize,
    pub documents_failed: usize,
    pub questions_attempted: usize,
    pub questions_failed: usize,
    pub elapsed: Duration,
}

impl<G: Gateway> Pipeline<G> {
    pub fn new(cfg: &Config, gateway: G) -> Self {
        Self {
            cfg: cfg.clone(),
            gateway,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Process every document against every question, appending each
    /// document's section to the report as soon as its questions have all
    /// been attempted. Per-document and per-question failures are contained
    /// and recorded; only report write failures abort the run.
    pub fn run(
        &self,
        documents: &[Document],
        questions: &QuestionSet,
        writer: &mut ReportWriter,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let total = documents.len();

        for (i, doc) in documents.iter().enumerate() {
            if self.cfg.options.resume && writer.has_section(&doc.title) {
                info!("document {}/{} \"{}\" already in report, skipping", i + 1, total, doc.title);
                summary.documents_skipped += 1;
                continue;
            }

            info!("document {}/{} \"{}\"", i + 1, total, doc.title);
            summary.documents_attempted += 1;
            let doc_started = Instant::now();

            let content = match source::read_content(doc) {
                Ok(c) => c,
                Err(err) => {
                    error!("ingest failed for \"{}\": {err}", doc.title);
                    summary.documents_failed += 1;
                    continue;
                }
            };

            let mut answers = Vec::with_capacity(questions.len());
            for (qi, question) in questions.questions.iter().enumerate() {
                info!("question {}/{} for \"{}\"", qi + 1, questions.len(), doc.title);
                summary.questions_attempted += 1;

                let q_started = Instant::now();
                let answer = match self.ask_with_retry(&content, question, questions.instructions())
                {
                    Ok(text) => Answer::success(question, text),
                    Err(err) => {
                        warn!(
                            "question {}/{} failed for \"{}\": {err}",
                            qi + 1,
                            questions.len(),
                            doc.title
                        );
                        summary.questions_failed += 1;
                        Answer::failure(question, err.to_string())
                    }
                };
                info!(
                    "question {}/{} done in {}",
                    qi + 1,
                    questions.len(),
                    format_duration(q_started.elapsed())
                );
                answers.push(answer);
            }

            let result = DocumentResult {
                title: doc.title.clone(),
                processed_at: now_rfc3339(),
                answers,
            };
            writer.append(&result)?;
            summary.documents_succeeded += 1;
            info!(
                "document \"{}\" done in {}",
                doc.title,
                format_duration(doc_started.elapsed())
            );
        }

        summary.elapsed = started.elapsed();
        log_summary(&summary);
        Ok(summary)
    }

    /// One gateway call per attempt; only transient failures are retried, up
    /// to `retry.max_retries` additional attempts with a fixed delay.
    fn ask_with_retry(
        &self,
        content: &DocumentContent,
        question: &str,
        instructions: Option<&str>,
    ) -> Result<String, GatewayError> {
        let max_retries = self.cfg.retry.max_retries;
        let mut attempt = 0;
        loop {
            match self.gateway.ask(content, question, instructions) {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < max_retries => {
                    attempt += 1;
                    warn!(
                        "transient gateway failure (attempt {}/{}): {err}",
                        attempt,
                        max_retries + 1
                    );
                    if self.cfg.retry.delay_ms > 0 {
                        std::thread::sleep(Duration::from_millis(self.cfg.retry.delay_ms));
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn log_summary(summary: &RunSummary) {
    info!(
        "run complete documents_attempted={} succeeded={} skipped={} failed={}",
        summary.documents_attempted,
        summary.documents_succeeded,
        summary.documents_skipped,
        summary.documents_failed
    );
    info!(
        "questions attempted={} failed={} elapsed={}",
        summary.questions_attempted,
        summary.questions_failed,
        format_duration(summary.elapsed)
    );
}
