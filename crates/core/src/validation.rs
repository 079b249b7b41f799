//! Contact field sanitization and validity predicates.
//!
//! Sanitization runs on every update, so a [`Contact`] never holds a name
//! with digits or a phone number with punctuation. Validity is a separate,
//! continuously re-evaluated question that only gates submission.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Minimum number of characters in a valid name.
pub const DEFAULT_MIN_NAME_LEN: usize = 8;

/// Minimum number of digits in a valid phone number.
pub const DEFAULT_MIN_PHONE_DIGITS: usize = 7;

/// Structural email check: `local@domain.tld`, no whitespace, a single `@`
/// before the last dot-separated part. Not RFC 5322.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.\S+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// The editable contact fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Phone,
    Email,
    Comments,
}

/// Strip characters a field may not contain.
///
/// - `name`: keeps ASCII letters and whitespace.
/// - `phone`: keeps ASCII digits.
/// - `email`, `comments`: unchanged.
pub fn sanitize_field(field: Field, raw: &str) -> String {
    match field {
        Field::Name => raw
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect(),
        Field::Phone => raw.chars().filter(char::is_ascii_digit).collect(),
        Field::Email | Field::Comments => raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// Contact details collected in the last input step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub comments: String,
}

impl Contact {
    /// Sanitize `raw` for `field` and store it.
    pub fn update(&mut self, field: Field, raw: &str) {
        let value = sanitize_field(field, raw);
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Email => self.email = value,
            Field::Comments => self.comments = value,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Comments => &self.comments,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Per-field validity, for inline indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldValidity {
    pub name: bool,
    pub phone: bool,
    pub email: bool,
}

impl FieldValidity {
    pub fn all(self) -> bool {
        self.name && self.phone && self.email
    }
}

/// Validation thresholds for contact details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactRules {
    pub min_name_len: usize,
    pub min_phone_digits: usize,
}

impl Default for ContactRules {
    fn default() -> Self {
        Self {
            min_name_len: DEFAULT_MIN_NAME_LEN,
            min_phone_digits: DEFAULT_MIN_PHONE_DIGITS,
        }
    }
}

impl ContactRules {
    pub fn is_name_valid(&self, name: &str) -> bool {
        sanitize_field(Field::Name, name).chars().count() >= self.min_name_len
    }

    pub fn is_phone_valid(&self, phone: &str) -> bool {
        sanitize_field(Field::Phone, phone).chars().count() >= self.min_phone_digits
    }

    pub fn is_email_valid(&self, email: &str) -> bool {
        EMAIL_RE.is_match(email)
    }

    pub fn field_validity(&self, contact: &Contact) -> FieldValidity {
        FieldValidity {
            name: self.is_name_valid(&contact.name),
            phone: self.is_phone_valid(&contact.phone),
            email: self.is_email_valid(&contact.email),
        }
    }

    /// The single gate for final submission.
    pub fn is_form_valid(&self, contact: &Contact) -> bool {
        self.field_validity(contact).all()
    }

    /// Like [`is_form_valid`](Self::is_form_valid), naming every failing field.
    pub fn validate(&self, contact: &Contact) -> Result<(), CoreError> {
        let validity = self.field_validity(contact);
        let mut problems: Vec<String> = Vec::new();
        if !validity.name {
            problems.push(format!(
                "name must contain at least {} letters",
                self.min_name_len
            ));
        }
        if !validity.phone {
            problems.push(format!(
                "phone must contain at least {} digits",
                self.min_phone_digits
            ));
        }
        if !validity.email {
            problems.push("email must look like name@domain.tld".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(problems.join("; ")))
        }
    }
}

/// [`ContactRules::is_name_valid`] with default thresholds.
pub fn is_name_valid(name: &str) -> bool {
    ContactRules::default().is_name_valid(name)
}

/// [`ContactRules::is_phone_valid`] with default thresholds.
pub fn is_phone_valid(phone: &str) -> bool {
    ContactRules::default().is_phone_valid(phone)
}

pub fn is_email_valid(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// [`ContactRules::is_form_valid`] with default thresholds.
pub fn is_form_valid(contact: &Contact) -> bool {
    ContactRules::default().is_form_valid(contact)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Mixed inputs used by the sanitizer properties below.
    const SAMPLES: &[&str] = &[
        "",
        "Jordan Smith",
        "J0rdan_Sm1th!!",
        "  tabs\tand\nnewlines ",
        "+1 (555) 123-4567",
        "émile zola",
        "DROP TABLE airport_feedback;",
        "12345",
        "@@@",
        "Ωmega ١٢٣ digits",
    ];

    fn is_name_char(c: char) -> bool {
        c.is_ascii_alphabetic() || c.is_whitespace()
    }

    fn contact(name: &str, phone: &str, email: &str) -> Contact {
        Contact {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            comments: String::new(),
        }
    }

    // -- sanitize_field --

    #[test]
    fn name_keeps_only_letters_and_whitespace() {
        for s in SAMPLES {
            let out = sanitize_field(Field::Name, s);
            assert!(out.chars().all(is_name_char), "sanitized name {out:?}");
        }
        assert_eq!(sanitize_field(Field::Name, "J0rdan_Sm1th!!"), "JrdanSmth");
    }

    #[test]
    fn phone_keeps_only_digits() {
        for s in SAMPLES {
            let out = sanitize_field(Field::Phone, s);
            assert!(
                out.chars().all(|c| c.is_ascii_digit()),
                "sanitized phone {out:?}"
            );
        }
        assert_eq!(
            sanitize_field(Field::Phone, "+1 (555) 123-4567"),
            "15551234567"
        );
    }

    #[test]
    fn sanitize_is_idempotent() {
        for field in [Field::Name, Field::Phone, Field::Email, Field::Comments] {
            for s in SAMPLES {
                let once = sanitize_field(field, s);
                assert_eq!(sanitize_field(field, &once), once, "{field:?} on {s:?}");
            }
        }
    }

    #[test]
    fn email_and_comments_pass_through() {
        for s in SAMPLES {
            assert_eq!(sanitize_field(Field::Email, s), *s);
            assert_eq!(sanitize_field(Field::Comments, s), *s);
        }
    }

    // -- Contact::update --

    #[test]
    fn update_sanitizes_at_mutation() {
        let mut c = Contact::default();
        c.update(Field::Name, "Al3x Tur4ner");
        c.update(Field::Phone, "555-0100");
        c.update(Field::Email, "alex@example.com");
        c.update(Field::Comments, "Gate 4 was great!");
        assert_eq!(c.get(Field::Name), "Alx Turner");
        assert_eq!(c.get(Field::Phone), "5550100");
        assert_eq!(c.get(Field::Email), "alex@example.com");
        assert_eq!(c.get(Field::Comments), "Gate 4 was great!");
    }

    // -- predicates --

    #[test]
    fn name_length_threshold() {
        assert!(!is_name_valid("Al"));
        assert!(!is_name_valid("Jo Smit"));
        assert!(is_name_valid("Jo Smith"));
        assert!(is_name_valid("Jordan Smith"));
    }

    #[test]
    fn phone_length_threshold() {
        assert!(!is_phone_valid("555123"));
        assert!(is_phone_valid("5551234"));
        assert!(is_phone_valid("5551234567"));
    }

    #[test]
    fn email_structure() {
        for ok in ["j@x.com", "first.last@sub.domain.org", "a@b.c"] {
            assert!(is_email_valid(ok), "{ok} should be valid");
        }
        for bad in ["", "j@x", "jx.com", "j @x.com", "@x.com", "j@.com", "j@x.", "j@@x.com"] {
            assert!(!is_email_valid(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn form_valid_iff_all_three_hold() {
        let names = [("Jordan Smith", true), ("Al", false)];
        let phones = [("5551234567", true), ("123", false)];
        let emails = [("j@x.com", true), ("not-an-email", false)];

        for (name, name_ok) in names {
            for (phone, phone_ok) in phones {
                for (email, email_ok) in emails {
                    let c = contact(name, phone, email);
                    assert_eq!(
                        is_form_valid(&c),
                        name_ok && phone_ok && email_ok,
                        "{name:?} {phone:?} {email:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn custom_thresholds_apply() {
        let rules = ContactRules {
            min_name_len: 2,
            min_phone_digits: 3,
        };
        assert!(rules.is_form_valid(&contact("Al", "123", "a@b.co")));
        assert!(!is_form_valid(&contact("Al", "123", "a@b.co")));
    }

    #[test]
    fn validate_names_each_failing_field() {
        let err = ContactRules::default()
            .validate(&contact("Al", "12", "nope"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("name"));
        assert!(err.contains("phone"));
        assert!(err.contains("email"));

        assert!(ContactRules::default()
            .validate(&contact("Jordan Smith", "5551234567", "j@x.com"))
            .is_ok());
    }
}
