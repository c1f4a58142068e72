use std::sync::Arc;

use serde_json::Value;

use crate::core::config::LlmConfig;
use crate::core::error::AppError;
use crate::features::tickets::dtos::ClassificationResponseDto;
use crate::features::tickets::models::{TicketCategory, TicketPriority};
use crate::shared::llm::{ChatCompletionRequest, ChatMessage, LlmClient, LlmError};
use crate::shared::validation::is_placeholder_api_key;

/// Near-deterministic sampling
const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// The answer is a two-field JSON object
const CLASSIFY_MAX_TOKENS: u32 = 50;

/// Why a classification suggestion could not be produced
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("OpenAI API key not configured")]
    NotConfigured,

    #[error("LLM unavailable: {0}")]
    Unavailable(#[from] LlmError),

    #[error("Could not parse LLM response")]
    Parse,

    #[error("LLM returned invalid classification")]
    InvalidClassification { category: String, priority: String },
}

impl ClassificationError {
    /// True when the provider could not be reached or answered with an error,
    /// false for local setup problems and unusable answers.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ClassificationError::Unavailable(_))
    }
}

impl From<ClassificationError> for AppError {
    fn from(e: ClassificationError) -> Self {
        AppError::ServiceUnavailable(e.to_string())
    }
}

fn category_guidance(category: TicketCategory) -> &'static str {
    match category {
        TicketCategory::Billing => {
            "charges, invoices, payments, refunds, subscriptions, pricing questions"
        }
        TicketCategory::Technical => {
            "bugs, errors, crashes, slow performance, broken features, integration problems"
        }
        TicketCategory::Account => {
            "login problems, password resets, profile changes, permissions, account access"
        }
        TicketCategory::General => {
            "feedback, feature requests, how-to questions, anything that fits nowhere else"
        }
    }
}

fn priority_guidance(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::Low => {
            "cosmetic issue, general question, minor inconvenience, feature request"
        }
        TicketPriority::Medium => "partial breakage with a workaround, moderate disruption",
        TicketPriority::High => {
            "major feature broken, blocking issue without workaround, time-sensitive business impact"
        }
        TicketPriority::Critical => {
            "full outage, risk of data loss, security vulnerability, product completely unusable"
        }
    }
}

/// Suggests a category and priority for a ticket description using an LLM
pub struct ClassificationService {
    llm: Arc<dyn LlmClient>,
    api_key: Option<String>,
    model: String,
}

impl ClassificationService {
    pub fn new(llm: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            llm,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !is_placeholder_api_key(self.api_key.as_deref())
    }

    /// Ask the LLM for a classification. Makes exactly one provider call, or none
    /// when no usable API key is configured.
    pub async fn classify(
        &self,
        description: &str,
    ) -> Result<ClassificationResponseDto, ClassificationError> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if self.is_configured() => key.trim(),
            _ => return Err(ClassificationError::NotConfigured),
        };

        let request = self.build_request(description);

        let raw = self.llm.complete(api_key, &request).await.map_err(|e| {
            tracing::error!("LLM API error: {}", e);
            ClassificationError::Unavailable(e)
        })?;

        Self::parse_classification(&raw)
    }

    fn build_request(&self, description: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(Self::build_system_prompt()),
                ChatMessage::user(description),
            ],
            temperature: CLASSIFY_TEMPERATURE,
            max_tokens: CLASSIFY_MAX_TOKENS,
        }
    }

    fn build_system_prompt() -> String {
        let categories = TicketCategory::ALL
            .iter()
            .map(|c| format!("- {}: {}", c, category_guidance(*c)))
            .collect::<Vec<_>>()
            .join("\n");

        let priorities = TicketPriority::ALL
            .iter()
            .rev()
            .map(|p| format!("- {}: {}", p, priority_guidance(*p)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You classify customer support tickets. Given the customer's description of their issue, choose the best category and priority.

CATEGORY (exactly one):
{}

PRIORITY (exactly one):
{}

Respond with ONLY a JSON object, without markdown or explanation:
{{"category": "...", "priority": "..."}}"#,
            categories, priorities
        )
    }

    /// Strictly parse and normalize the raw completion text
    fn parse_classification(raw: &str) -> Result<ClassificationResponseDto, ClassificationError> {
        let raw = raw.trim();

        let value: Value = serde_json::from_str(raw).map_err(|_| {
            tracing::error!("LLM returned non-JSON: {}", raw);
            ClassificationError::Parse
        })?;

        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_lowercase()
        };
        let category = field("category");
        let priority = field("priority");

        match (
            category.parse::<TicketCategory>(),
            priority.parse::<TicketPriority>(),
        ) {
            (Ok(suggested_category), Ok(suggested_priority)) => Ok(ClassificationResponseDto {
                suggested_category,
                suggested_priority,
            }),
            _ => {
                tracing::error!("LLM returned invalid values: {} / {}", category, priority);
                Err(ClassificationError::InvalidClassification { category, priority })
            }
        }
    }
}
