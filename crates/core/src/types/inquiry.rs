//! Inquiry model and the submission validation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::InquiryId;
use super::phone::PhoneNumber;

/// A submitted contact request, as seen by the application and the admin UI.
///
/// Serializes with camelCase keys (`isRead`, `createdAt`); storage naming is
/// the store layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: InquiryId,
    pub name: String,
    pub phone: String,
    pub inquiry: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Reasons a submission is rejected, in the order they are checked.
///
/// The `Display` text is shown to visitors as-is.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// One of `name`, `phone`, `inquiry` is absent or empty.
    #[error("모든 필드를 입력해주세요.")]
    MissingField,
    /// Name shorter than [`NewInquiry::MIN_NAME_LENGTH`].
    #[error("이름은 2자 이상 입력해주세요.")]
    NameTooShort,
    /// Phone does not match the Korean numbering plan.
    #[error("올바른 전화번호 형식을 입력해주세요.")]
    InvalidPhone,
    /// Message shorter than [`NewInquiry::MIN_INQUIRY_LENGTH`].
    #[error("문의 내용은 5자 이상 입력해주세요.")]
    InquiryTooShort,
}

impl ValidationError {
    /// Short machine-oriented name of the failing rule (used in logs).
    #[must_use]
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::MissingField => "missing field",
            Self::NameTooShort => "name too short",
            Self::InvalidPhone => "invalid phone format",
            Self::InquiryTooShort => "inquiry too short",
        }
    }
}

/// A validated inquiry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    name: String,
    phone: PhoneNumber,
    inquiry: String,
}

impl NewInquiry {
    /// Minimum name length, in characters.
    pub const MIN_NAME_LENGTH: usize = 2;

    /// Minimum message length, in characters.
    pub const MIN_INQUIRY_LENGTH: usize = 5;

    /// Validate raw form input.
    ///
    /// Fields are checked and kept exactly as submitted; only an absent or
    /// empty field counts as missing. Checks run in order and stop at the
    /// first failure:
    ///
    /// 1. all fields present
    /// 2. name length
    /// 3. phone format
    /// 4. message length
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first rule that fails.
    pub fn validate(
        name: Option<&str>,
        phone: Option<&str>,
        inquiry: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let (Some(name), Some(phone), Some(inquiry)) =
            (present(name), present(phone), present(inquiry))
        else {
            return Err(ValidationError::MissingField);
        };

        if name.chars().count() < Self::MIN_NAME_LENGTH {
            return Err(ValidationError::NameTooShort);
        }

        let phone = PhoneNumber::parse(phone).map_err(|_| ValidationError::InvalidPhone)?;

        if inquiry.chars().count() < Self::MIN_INQUIRY_LENGTH {
            return Err(ValidationError::InquiryTooShort);
        }

        Ok(Self {
            name: name.to_owned(),
            phone,
            inquiry: inquiry.to_owned(),
        })
    }

    /// Visitor's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    #[must_use]
    pub fn inquiry(&self) -> &str {
        &self.inquiry
    }
}

/// The value, or `None` when absent or empty.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn validate(name: &str, phone: &str, inquiry: &str) -> Result<NewInquiry, ValidationError> {
        NewInquiry::validate(Some(name), Some(phone), Some(inquiry))
    }

    #[test]
    fn test_valid_submission() {
        let new = validate("홍길동", "010-1234-5678", "상담 요청합니다").unwrap();
        assert_eq!(new.name(), "홍길동");
        assert_eq!(new.phone().as_str(), "010-1234-5678");
        assert_eq!(new.inquiry(), "상담 요청합니다");
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            NewInquiry::validate(None, Some("010-1234-5678"), Some("hello world")),
            Err(ValidationError::MissingField)
        );
        assert_eq!(
            NewInquiry::validate(Some("홍길동"), None, Some("hello world")),
            Err(ValidationError::MissingField)
        );
        assert_eq!(
            validate("홍길동", "010-1234-5678", ""),
            Err(ValidationError::MissingField)
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        assert_eq!(
            validate("홍", "010-1234-5678", "상담 요청합니다"),
            Err(ValidationError::NameTooShort)
        );
        assert!(validate("홍길", "010-1234-5678", "상담 요청합니다").is_ok());
    }

    #[test]
    fn test_invalid_phone() {
        assert_eq!(
            validate("홍길동", "123", "상담 요청합니다"),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            validate("홍길동", "010-12-3456", "상담 요청합니다"),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn test_inquiry_too_short() {
        assert_eq!(
            validate("홍길동", "010-1234-5678", "문의"),
            Err(ValidationError::InquiryTooShort)
        );
        assert!(validate("홍길동", "010-1234-5678", "다섯글자요").is_ok());
    }

    #[test]
    fn test_first_failing_rule_wins() {
        // Name, phone, and message are all bad; name is reported
        assert_eq!(
            validate("홍", "123", "짧음"),
            Err(ValidationError::NameTooShort)
        );
        // Phone and message bad; phone is reported
        assert_eq!(
            validate("홍길동", "123", "짧음"),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn test_fields_are_kept_as_submitted() {
        // Surrounding whitespace counts toward length and is stored
        let new = validate(" 홍 ", "010-1234-5678", "  상담\n").unwrap();
        assert_eq!(new.name(), " 홍 ");
        assert_eq!(new.inquiry(), "  상담\n");

        // Whitespace-only fields are present, then fail the length rules
        assert_eq!(
            validate(" ", "010-1234-5678", "상담 요청합니다"),
            Err(ValidationError::NameTooShort)
        );
        assert_eq!(
            validate("홍길동", "010-1234-5678", "    "),
            Err(ValidationError::InquiryTooShort)
        );
    }

    #[test]
    fn test_padded_phone_is_rejected() {
        assert_eq!(
            validate("홍길동", " 010-1234-5678", "상담 요청합니다"),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn test_inquiry_serializes_camel_case() {
        let inquiry = Inquiry {
            id: InquiryId::random(),
            name: "홍길동".to_string(),
            phone: "010-1234-5678".to_string(),
            inquiry: "상담 요청합니다".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(value["isRead"], false);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("is_read").is_none());
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(ValidationError::MissingField.rule(), "missing field");
        assert_eq!(ValidationError::InvalidPhone.rule(), "invalid phone format");
    }
}
