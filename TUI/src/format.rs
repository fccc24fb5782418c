//! Per-field casing rules applied on every keystroke.

use crate::form::Field;

pub fn format_field(value: &str, field: Field) -> String {
    match field {
        Field::Name => title_case(value),
        Field::Email => capitalize_first(&value.to_lowercase()),
        Field::Subject | Field::Message => sentence_case(value),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalize every space-separated token; runs of spaces are kept.
fn title_case(value: &str) -> String {
    value
        .to_lowercase()
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first non-whitespace char of the text and of every
/// sentence following `.`, `!` or `?`.
fn sentence_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut capitalize = true;
    for ch in value.to_lowercase().chars() {
        if capitalize && !ch.is_whitespace() {
            out.extend(ch.to_uppercase());
            capitalize = false;
        } else {
            out.push(ch);
        }
        if matches!(ch, '.' | '!' | '?') {
            capitalize = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        assert_eq!(format_field("john DOE", Field::Name), "John Doe");
        assert_eq!(format_field("mary-jane o", Field::Name), "Mary-jane O");
    }

    #[test]
    fn test_format_name_keeps_double_spaces() {
        assert_eq!(format_field("ada  lovelace", Field::Name), "Ada  Lovelace");
    }

    #[test]
    fn test_format_email() {
        assert_eq!(
            format_field("JOHN.DOE@EXAMPLE.COM", Field::Email),
            "John.doe@example.com"
        );
    }

    #[test]
    fn test_format_subject_sentences() {
        assert_eq!(
            format_field("HELLO world. HOW are you?", Field::Subject),
            "Hello world. How are you?"
        );
    }

    #[test]
    fn test_format_message_multiple_terminators() {
        assert_eq!(
            format_field("great!!   thanks. bye?ok", Field::Message),
            "Great!!   Thanks. Bye?Ok"
        );
    }

    #[test]
    fn test_format_leading_whitespace() {
        assert_eq!(format_field("   hi there", Field::Message), "   Hi there");
    }

    #[test]
    fn test_format_empty() {
        for field in Field::ALL {
            assert_eq!(format_field("", field), "");
        }
    }
}
