pub mod gemini;
pub mod types;

use crate::source::DocumentContent;
use thiserror::Error;

pub use gemini::GeminiGateway;

/// Abstraction over the hosted generative-model call. The pipeline only sees
/// this capability; it never learns how an answer was produced, and two calls
/// with identical inputs may return different text.
pub trait Gateway {
    fn ask(
        &self,
        content: &DocumentContent,
        question: &str,
        instructions: Option<&str>,
    ) -> Result<String, GatewayError>;

    /// Identifier recorded in the report header.
    fn model_id(&self) -> &str;
}

/// Classifies a failed gateway call. Only `Transient` is worth retrying;
/// everything else fails the question immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Transient,
    Auth,
    InvalidRequest,
    Unknown,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == GatewayErrorKind::Transient
    }
}

const BASE_INSTRUCTIONS: &str = "Please provide a concise but comprehensive answer based on the \
information available in the paper. If the information is not available in the provided document, \
please state that clearly.";

/// Build the full prompt for one (document, question) invocation.
pub fn build_prompt(question: &str, instructions: Option<&str>) -> String {
    let full_instructions = match instructions {
        Some(extra) => format!("{BASE_INSTRUCTIONS}\n\nAdditional instructions: {extra}"),
        None => BASE_INSTRUCTIONS.to_string(),
    };
    format!(
        "Based on the research paper document, please answer this question: {question}\n\n{full_instructions}"
    )
}
