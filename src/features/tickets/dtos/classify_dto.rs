use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::tickets::models::{TicketCategory, TicketPriority};
use crate::shared::validation::validate_text;

/// Request DTO for classification suggestions
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ClassifyTicketDto {
    /// Free-text issue description written by the customer
    #[validate(custom(function = "validate_text"))]
    pub description: String,
}

/// Suggested classification. Never applied to a ticket automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResponseDto {
    pub suggested_category: TicketCategory,
    pub suggested_priority: TicketPriority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dto_validation() {
        let dto: ClassifyTicketDto =
            serde_json::from_str(r#"{"description": "App crashes on start"}"#).unwrap();
        assert!(dto.validate().is_ok());

        let blank: ClassifyTicketDto = serde_json::from_str(r#"{"description": "  "}"#).unwrap();
        assert!(blank.validate().is_err());

        assert!(serde_json::from_str::<ClassifyTicketDto>("{}").is_err());
    }

    #[test]
    fn test_classification_response_shape() {
        let body = serde_json::to_value(ClassificationResponseDto {
            suggested_category: TicketCategory::Technical,
            suggested_priority: TicketPriority::Critical,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "suggested_category": "technical",
                "suggested_priority": "critical"
            })
        );
    }
}
