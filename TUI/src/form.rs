//! Contact form data model.

use rand::rngs::OsRng;
use rand::RngCore;

/// Visible fields of the contact form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "John Doe",
            Field::Email => "john.doe@example.com",
            Field::Subject => "Project inquiry",
            Field::Message => "Your message here...",
        }
    }

    pub fn next(self) -> Field {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Subject,
            Field::Subject => Field::Message,
            Field::Message => Field::Name,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Name => Field::Message,
            Field::Email => Field::Name,
            Field::Subject => Field::Email,
            Field::Message => Field::Subject,
        }
    }
}

/// Stored (sanitized and formatted) form values.
///
/// `honeypot` is never rendered or focusable; anything in it marks the
/// submission as automated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub honeypot: String,
    pub security_token: String,
}

impl FormState {
    /// Empty form with a fresh security token.
    pub fn new() -> Self {
        Self {
            security_token: generate_security_token(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Subject => self.subject = value,
            Field::Message => self.message = value,
        }
    }

    pub fn is_bot_submission(&self) -> bool {
        !self.honeypot.is_empty()
    }
}

/// 16 bytes from the OS RNG, lowercase hex.
pub fn generate_security_token() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_token_is_32_hex_chars() {
        let token = generate_security_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_security_tokens_differ() {
        assert_ne!(generate_security_token(), generate_security_token());
    }

    #[test]
    fn test_new_form_is_empty_with_token() {
        let state = FormState::new();
        for field in Field::ALL {
            assert!(state.get(field).is_empty());
        }
        assert!(!state.is_bot_submission());
        assert_eq!(state.security_token.len(), 32);
    }

    #[test]
    fn test_field_cycle() {
        let mut field = Field::Name;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, Field::Name);
        assert_eq!(Field::Name.prev(), Field::Message);
    }
}
