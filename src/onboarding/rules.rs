//! Credential field rules shared by the login, signup and OTP screens.
//!
//! Each rule is keyed by field so every screen reports the same message for
//! the same mistake.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Indian mobile numbers: ten digits starting 6-9, optional +91/0 prefix.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+91|0)?[6-9]\d{9}$").unwrap());

static OTP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialField {
    FullName,
    Phone,
    Password,
    ConfirmPassword,
    Otp,
}

/// Input collected by a credential screen. Screens leave unused fields `None`.
#[derive(Debug, Clone, Default)]
pub struct CredentialInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub otp: Option<String>,
}

/// Strip the spaces and dashes people type inside phone numbers.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

/// Check one field in isolation.
///
/// `ConfirmPassword` only checks presence here; matching against the
/// password happens in [`validate_credentials`].
pub fn validate_field(field: CredentialField, value: &str) -> Option<&'static str> {
    match field {
        CredentialField::FullName => {
            if value.trim().is_empty() {
                Some("Full name is required")
            } else {
                None
            }
        }
        CredentialField::Phone => {
            let phone = normalize_phone(value);
            if phone.is_empty() {
                Some("Phone number is required")
            } else if !PHONE.is_match(&phone) {
                Some("Please enter a valid 10-digit mobile number")
            } else {
                None
            }
        }
        CredentialField::Password => {
            if value.is_empty() {
                Some("Password is required")
            } else if value.chars().count() < MIN_PASSWORD_LEN {
                Some("Password must be at least 8 characters")
            } else {
                None
            }
        }
        CredentialField::ConfirmPassword => {
            if value.is_empty() {
                Some("Please confirm your password")
            } else {
                None
            }
        }
        CredentialField::Otp => {
            if !OTP.is_match(value.trim()) {
                Some("Enter the 6-digit code")
            } else {
                None
            }
        }
    }
}

/// Validate every field a screen supplied.
pub fn validate_credentials(input: &CredentialInput) -> BTreeMap<CredentialField, &'static str> {
    let mut errors = BTreeMap::new();
    let fields = [
        (CredentialField::FullName, &input.full_name),
        (CredentialField::Phone, &input.phone),
        (CredentialField::Password, &input.password),
        (CredentialField::ConfirmPassword, &input.confirm_password),
        (CredentialField::Otp, &input.otp),
    ];

    for (field, value) in fields {
        if let Some(value) = value {
            if let Some(message) = validate_field(field, value) {
                errors.insert(field, message);
            }
        }
    }

    if let (Some(password), Some(confirm)) = (&input.password, &input.confirm_password) {
        if !confirm.is_empty() && password != confirm {
            errors.insert(CredentialField::ConfirmPassword, "Passwords do not match");
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert_eq!(validate_field(CredentialField::Phone, "98765 43210"), None);
        assert_eq!(validate_field(CredentialField::Phone, "+919876543210"), None);
        assert_eq!(
            validate_field(CredentialField::Phone, "12345"),
            Some("Please enter a valid 10-digit mobile number")
        );
        assert_eq!(
            validate_field(CredentialField::Phone, "5876543210"),
            Some("Please enter a valid 10-digit mobile number")
        );
        assert_eq!(
            validate_field(CredentialField::Phone, "  "),
            Some("Phone number is required")
        );
    }

    #[test]
    fn password_length() {
        assert_eq!(
            validate_field(CredentialField::Password, "short"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(validate_field(CredentialField::Password, "longenough"), None);
    }

    #[test]
    fn otp_must_be_six_digits() {
        assert_eq!(validate_field(CredentialField::Otp, "123456"), None);
        assert!(validate_field(CredentialField::Otp, "12a456").is_some());
        assert!(validate_field(CredentialField::Otp, "1234567").is_some());
    }

    #[test]
    fn signup_form_reports_mismatch() {
        let input = CredentialInput {
            full_name: Some("Ramesh Patil".into()),
            phone: Some("9876543210".into()),
            password: Some("password1".into()),
            confirm_password: Some("password2".into()),
            otp: None,
        };
        let errors = validate_credentials(&input);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(&CredentialField::ConfirmPassword),
            Some(&"Passwords do not match")
        );
    }

    #[test]
    fn login_form_skips_absent_fields() {
        let input = CredentialInput {
            phone: Some("9876543210".into()),
            password: Some("".into()),
            ..Default::default()
        };
        let errors = validate_credentials(&input);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(&CredentialField::Password), Some(&"Password is required"));
    }
}
