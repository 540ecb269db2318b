//! Maps failures onto a closed set of categories with operator/user messages
//! and a retry hint.
//!
//! Classification is textual: the error and all of its sources are rendered,
//! lower-cased, and matched against [`RULES`] in order. The first rule with a
//! matching needle wins; nothing matching falls through to
//! [`ErrorType::UnknownError`].

use std::error::Error;

use serde::Serialize;

/// Failure categories (wire values are snake_case).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    DatabaseUnavailable,
    RateLimit,
    ModelUnavailable,
    TokenLimit,
    AuthError,
    NetworkError,
    UnknownError,
}

/// A failure ready to be returned to a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub error_type: ErrorType,
    /// Operator-facing description.
    pub message: String,
    /// End-user-facing description.
    pub user_message: String,
    /// Seconds before a retry makes sense; `0` means do not retry.
    #[serde(rename = "retry_after")]
    pub retry_after_secs: u64,
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.error_type, self.message)
    }
}

impl Error for ClassifiedError {}

impl ClassifiedError {
    /// No verse index is bound.
    pub fn database_unavailable() -> Self {
        Self {
            error_type: ErrorType::DatabaseUnavailable,
            message: "The verse index is not available. Please check the vector store configuration."
                .into(),
            user_message:
                "🔮 The divine knowledge base is temporarily unavailable. Please try again later."
                    .into(),
            retry_after_secs: 0,
        }
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct ClassificationRule {
    /// Lower-case substrings; any of them selects this rule.
    pub needles: &'static [&'static str],
    pub error_type: ErrorType,
    pub retry_after_secs: u64,
    pub message: &'static str,
    pub user_message: &'static str,
}

/// Ordered rules, first match wins.
pub const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        needles: &["413", "rate_limit", "tokens per minute"],
        error_type: ErrorType::RateLimit,
        retry_after_secs: 60,
        message: "The AI service is currently experiencing high demand. Please wait a moment and try again.",
        user_message: "🌊 The divine wisdom is in high demand right now. Please wait a moment and try again.",
    },
    ClassificationRule {
        needles: &["model_decommissioned", "model not found"],
        error_type: ErrorType::ModelUnavailable,
        retry_after_secs: 300,
        message: "The AI model is temporarily unavailable. Please try again later.",
        user_message: "🕉️ The divine connection is temporarily unavailable. Please try again in a few moments.",
    },
    ClassificationRule {
        needles: &["payload too large", "request too large"],
        error_type: ErrorType::TokenLimit,
        retry_after_secs: 0,
        message: "The request was too large. Please try a shorter question.",
        user_message: "📝 Your question is too detailed. Please try a shorter, more focused question.",
    },
    ClassificationRule {
        needles: &["401", "unauthorized"],
        error_type: ErrorType::AuthError,
        retry_after_secs: 0,
        message: "Authentication error with the AI service.",
        user_message: "🔐 There's an issue with the divine connection. Please contact support.",
    },
    ClassificationRule {
        needles: &["timeout", "connection"],
        error_type: ErrorType::NetworkError,
        retry_after_secs: 30,
        message: "Network connection error.",
        user_message: "🌐 The divine connection is weak. Please check your internet and try again.",
    },
];

const UNKNOWN_RETRY_SECS: u64 = 60;
const UNKNOWN_USER_MESSAGE: &str =
    "✨ The divine wisdom is temporarily unavailable. Please try again later.";

/// Classifies an error by its rendered source chain.
pub fn classify(err: &(dyn Error + 'static)) -> ClassifiedError {
    classify_message(&render_chain(err))
}

/// Classifies already rendered error text.
pub fn classify_message(text: &str) -> ClassifiedError {
    let haystack = text.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|n| haystack.contains(n)))
        .map(|rule| ClassifiedError {
            error_type: rule.error_type,
            message: rule.message.to_string(),
            user_message: rule.user_message.to_string(),
            retry_after_secs: rule.retry_after_secs,
        })
        .unwrap_or_else(|| ClassifiedError {
            error_type: ErrorType::UnknownError,
            message: format!("An unexpected error occurred: {text}"),
            user_message: UNKNOWN_USER_MESSAGE.to_string(),
            retry_after_secs: UNKNOWN_RETRY_SECS,
        })
}

/// `outer: source: source-of-source ...`, skipping sources whose text is
/// already part of their parent's message.
fn render_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(e) = cur {
        let s = e.to_string();
        if !out.contains(&s) {
            out.push_str(": ");
            out.push_str(&s);
        }
        cur = e.source();
    }
    out
}
