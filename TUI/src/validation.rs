//! Field patterns, suspicious-content signatures and form validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::warn;
use regex::{Regex, RegexSet};
use thiserror::Error;

use crate::form::{Field, FormState};

/// Shortest value the as-you-type check looks at.
pub const LIVE_CHECK_MIN_CHARS: usize = 3;

pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-'.]{2,50}$").unwrap());

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .unwrap()
});

static SUBJECT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_,.?!()]{3,100}$").unwrap());

// Values are stored escaped, so the script tag is also matched as `&lt;script`.
static SUSPICIOUS_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)(<|&lt;)script",
        r"(?i)javascript:",
        r"(?i)on\w+=",
        r"(?i)data:",
        r"(?i)vbscript:",
        r"(?i)document\.",
        r"(?i)window\.",
        r"(?i)alert\(",
        r"(?i)confirm\(",
        r"(?i)prompt\(",
        r"(?i)eval\(",
        r"(?i)exec\(",
        r"(?i)SELECT.*FROM",
        r"(?i)INSERT.*INTO",
        r"(?i)UPDATE.*SET",
        r"(?i)DELETE.*FROM",
        r"(?i)UNION.*SELECT",
        r"(?i)DROP.*TABLE",
    ])
    .unwrap()
});

/// Everything the form can report, field-scoped or general.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ERR: Invalid name format detected")]
    NameInvalid,
    #[error("ERR: Name parameter required")]
    NameRequired,
    #[error("ERR: Invalid email format detected")]
    EmailInvalid,
    #[error("ERR: Email parameter required")]
    EmailRequired,
    #[error("ERR: Subject contains invalid characters")]
    SubjectInvalid,
    #[error("ERR: Subject parameter required")]
    SubjectRequired,
    #[error("ERR: Message too short (min 10 chars)")]
    MessageTooShort,
    #[error("ERR: Message exceeds max length")]
    MessageTooLong,
    #[error("ERR: Message content empty")]
    MessageRequired,
    #[error("ERR: Potentially malicious content detected")]
    SuspiciousContent,
    #[error("Security alert: Potentially malicious input detected")]
    SecurityAlert,
    #[error("ERR: Too many attempts. Please try again later")]
    RateLimit,
}

impl ValidationError {
    pub fn code(self) -> &'static str {
        match self {
            ValidationError::NameInvalid => "NAME_INVALID",
            ValidationError::NameRequired => "NAME_REQUIRED",
            ValidationError::EmailInvalid => "EMAIL_INVALID",
            ValidationError::EmailRequired => "EMAIL_REQUIRED",
            ValidationError::SubjectInvalid => "SUBJECT_INVALID",
            ValidationError::SubjectRequired => "SUBJECT_REQUIRED",
            ValidationError::MessageTooShort => "MESSAGE_TOO_SHORT",
            ValidationError::MessageTooLong => "MESSAGE_TOO_LONG",
            ValidationError::MessageRequired => "MESSAGE_REQUIRED",
            ValidationError::SuspiciousContent => "SUSPICIOUS_CONTENT",
            ValidationError::SecurityAlert => "SECURITY_ALERT",
            ValidationError::RateLimit => "RATE_LIMIT",
        }
    }

    fn required(field: Field) -> Self {
        match field {
            Field::Name => ValidationError::NameRequired,
            Field::Email => ValidationError::EmailRequired,
            Field::Subject => ValidationError::SubjectRequired,
            Field::Message => ValidationError::MessageRequired,
        }
    }
}

/// Field-scoped errors plus at most one form-general error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, ValidationError>,
    general: Option<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    pub fn get(&self, field: Field) -> Option<ValidationError> {
        self.fields.get(&field).copied()
    }

    pub fn set(&mut self, field: Field, error: ValidationError) {
        self.fields.insert(field, error);
    }

    pub fn clear_field(&mut self, field: Field) {
        self.fields.remove(&field);
    }

    pub fn general(&self) -> Option<ValidationError> {
        self.general
    }

    pub fn set_general(&mut self, error: ValidationError) {
        self.general = Some(error);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.general = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, ValidationError)> + '_ {
        self.fields.iter().map(|(f, e)| (*f, *e))
    }
}

pub fn matches_pattern(value: &str, field: Field) -> bool {
    match field {
        Field::Name => NAME_PATTERN.is_match(value),
        Field::Email => EMAIL_PATTERN.is_match(value),
        Field::Subject => SUBJECT_PATTERN.is_match(value),
        Field::Message => {
            let len = value.chars().count();
            (MESSAGE_MIN_CHARS..=MESSAGE_MAX_CHARS).contains(&len)
        }
    }
}

pub fn contains_suspicious_pattern(value: &str) -> bool {
    SUSPICIOUS_PATTERNS.is_match(value)
}

fn pattern_error(value: &str, field: Field) -> Option<ValidationError> {
    if matches_pattern(value, field) {
        return None;
    }
    Some(match field {
        Field::Name => ValidationError::NameInvalid,
        Field::Email => ValidationError::EmailInvalid,
        Field::Subject => ValidationError::SubjectInvalid,
        Field::Message if value.chars().count() < MESSAGE_MIN_CHARS => {
            ValidationError::MessageTooShort
        }
        Field::Message => ValidationError::MessageTooLong,
    })
}

/// Full check run at submission. The first field (in tab order) carrying a
/// suspicious signature gets `SuspiciousContent` and raises the general
/// alert; other field errors are kept.
pub fn validate_form(state: &FormState) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    for field in Field::ALL {
        let value = state.get(field);
        if value.trim().is_empty() {
            errors.set(field, ValidationError::required(field));
        } else if let Some(err) = pattern_error(value, field) {
            errors.set(field, err);
        }
    }

    if let Some(field) = Field::ALL
        .into_iter()
        .find(|f| contains_suspicious_pattern(state.get(*f)))
    {
        warn!("Suspicious content detected in {} field", field.label());
        errors.set(field, ValidationError::SuspiciousContent);
        errors.set_general(ValidationError::SecurityAlert);
    }

    errors
}

/// As-you-type check for one field. Values shorter than
/// [`LIVE_CHECK_MIN_CHARS`] are not judged yet.
pub fn validate_field_live(field: Field, value: &str) -> Option<ValidationError> {
    if value.chars().count() < LIVE_CHECK_MIN_CHARS {
        return None;
    }
    if contains_suspicious_pattern(value) {
        return Some(ValidationError::SuspiciousContent);
    }
    pattern_error(value, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_state() -> FormState {
        FormState {
            name: "John Doe".to_string(),
            email: "John.doe@example.com".to_string(),
            subject: "Project inquiry".to_string(),
            message: "Hello, I would like to talk about a project.".to_string(),
            ..FormState::default()
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate_form(&valid_state()).is_empty());
    }

    #[test]
    fn test_name_pattern_bounds() {
        assert!(matches_pattern("Jo", Field::Name));
        assert!(matches_pattern("Mary-Jane O'Neil Jr.", Field::Name));
        assert!(!matches_pattern("J", Field::Name));
        assert!(!matches_pattern(&"a".repeat(51), Field::Name));
        assert!(!matches_pattern("R2D2", Field::Name));
    }

    #[test]
    fn test_name_errors() {
        let mut state = valid_state();
        state.name = "J".to_string();
        assert_eq!(validate_form(&state).get(Field::Name), Some(ValidationError::NameInvalid));

        state.name = "   ".to_string();
        assert_eq!(validate_form(&state).get(Field::Name), Some(ValidationError::NameRequired));

        state.name = "a".repeat(51);
        assert_eq!(validate_form(&state).get(Field::Name), Some(ValidationError::NameInvalid));
    }

    #[test]
    fn test_email_pattern() {
        assert!(matches_pattern("John.doe@example.com", Field::Email));
        assert!(matches_pattern("a@[10.0.0.1]", Field::Email));
        assert!(matches_pattern("\"odd name\"@example.org", Field::Email));
        assert!(!matches_pattern("john@localhost", Field::Email));
        assert!(!matches_pattern("john..doe@example.com", Field::Email));
        assert!(!matches_pattern("no-at-sign.com", Field::Email));
    }

    #[test]
    fn test_subject_pattern() {
        assert!(matches_pattern("Hi!", Field::Subject));
        assert!(!matches_pattern("Hi", Field::Subject));
        assert!(!matches_pattern("Price: $100", Field::Subject));
    }

    #[test]
    fn test_message_length() {
        let mut state = valid_state();
        state.message = "Too short".to_string();
        assert_eq!(
            validate_form(&state).get(Field::Message),
            Some(ValidationError::MessageTooShort)
        );

        state.message = "x".repeat(1001);
        assert_eq!(
            validate_form(&state).get(Field::Message),
            Some(ValidationError::MessageTooLong)
        );

        state.message = "x".repeat(1000);
        assert_eq!(validate_form(&state).get(Field::Message), None);
    }

    #[test]
    fn test_all_required() {
        let errors = validate_form(&FormState::default());
        assert_eq!(errors.get(Field::Name), Some(ValidationError::NameRequired));
        assert_eq!(errors.get(Field::Email), Some(ValidationError::EmailRequired));
        assert_eq!(errors.get(Field::Subject), Some(ValidationError::SubjectRequired));
        assert_eq!(errors.get(Field::Message), Some(ValidationError::MessageRequired));
        assert_eq!(errors.general(), None);
    }

    #[test]
    fn test_script_tag_any_case_is_suspicious() {
        for field in Field::ALL {
            let mut state = valid_state();
            state.set(field, format!("{} <ScRiPt>x", state.get(field)));
            let errors = validate_form(&state);
            assert_eq!(errors.get(field), Some(ValidationError::SuspiciousContent));
            assert_eq!(errors.general(), Some(ValidationError::SecurityAlert));
        }
    }

    #[test]
    fn test_escaped_script_tag_is_suspicious() {
        assert!(contains_suspicious_pattern("&lt;script&gt;alert"));
    }

    #[test]
    fn test_first_suspicious_field_wins_and_other_errors_kept() {
        let mut state = valid_state();
        state.name = "J".to_string();
        state.subject = "union all select x from y".to_string();
        state.message = "please eval(this) now".to_string();
        let errors = validate_form(&state);
        assert_eq!(errors.get(Field::Name), Some(ValidationError::NameInvalid));
        assert_eq!(errors.get(Field::Subject), Some(ValidationError::SuspiciousContent));
        assert_eq!(errors.get(Field::Message), None);
    }

    #[test]
    fn test_sql_signatures() {
        assert!(contains_suspicious_pattern("select name from users"));
        assert!(contains_suspicious_pattern("DROP TABLE students"));
        assert!(contains_suspicious_pattern("onerror=boom"));
        assert!(!contains_suspicious_pattern("I'd like to select a framework"));
    }

    #[test]
    fn test_live_check_waits_for_three_chars() {
        assert_eq!(validate_field_live(Field::Name, "J1"), None);
        assert_eq!(
            validate_field_live(Field::Name, "J12"),
            Some(ValidationError::NameInvalid)
        );
        assert_eq!(
            validate_field_live(Field::Message, "Hello"),
            Some(ValidationError::MessageTooShort)
        );
        assert_eq!(validate_field_live(Field::Subject, "Hey there"), None);
    }

    #[test]
    fn test_live_check_suspicious_overrides_pattern() {
        assert_eq!(
            validate_field_live(Field::Name, "javascript:x"),
            Some(ValidationError::SuspiciousContent)
        );
    }

    #[test]
    fn test_error_codes_and_messages() {
        assert_eq!(ValidationError::RateLimit.code(), "RATE_LIMIT");
        assert_eq!(
            ValidationError::RateLimit.to_string(),
            "ERR: Too many attempts. Please try again later"
        );
        assert_eq!(
            ValidationError::MessageTooShort.to_string(),
            "ERR: Message too short (min 10 chars)"
        );
    }

    #[test]
    fn test_clear_field() {
        let mut errors = validate_form(&FormState::default());
        errors.clear_field(Field::Name);
        assert_eq!(errors.get(Field::Name), None);
        assert_eq!(errors.iter().count(), 3);
    }
}
