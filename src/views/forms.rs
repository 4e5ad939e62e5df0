//! Form validation
//!
//! Validation is purely client-side: a form that fails it is never sent.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum password length accepted by the auth forms
pub const MIN_PASSWORD_LEN: usize = 8;

/// A single reason a form cannot be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0} is required")]
    MissingField(&'static str),
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern is valid")
    })
}

/// Whether `email` looks like an address
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn check_email(email: &str, errors: &mut Vec<ValidationError>) {
    if email.is_empty() {
        errors.push(ValidationError::EmailRequired);
    } else if !is_valid_email(email) {
        errors.push(ValidationError::InvalidEmail);
    }
}

fn check_password(password: &str, errors: &mut Vec<ValidationError>) {
    if password.is_empty() {
        errors.push(ValidationError::PasswordRequired);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::PasswordTooShort);
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Sign-in form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        finish(errors)
    }
}

/// Registration form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::MissingField("Name"));
        }
        if self.surname.trim().is_empty() {
            errors.push(ValidationError::MissingField("Surname"));
        }
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.password != self.confirm_password {
            errors.push(ValidationError::PasswordMismatch);
        }
        finish(errors)
    }
}

/// Password reset form
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub email: String,
}

impl ResetPasswordForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.email.is_empty() {
            errors.push(ValidationError::EmailRequired);
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("First.Last+tag@Mail.Example.ORG"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example.c"));
    }

    #[test]
    fn test_login_form() {
        assert!(LoginForm::new("user@example.com", "password1").validate().is_ok());

        let errors = LoginForm::new("nope", "short").validate().unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidEmail, ValidationError::PasswordTooShort]
        );

        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmailRequired, ValidationError::PasswordRequired]
        );
    }

    #[test]
    fn test_signup_form() {
        let mut form = SignupForm {
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "analytical".to_string(),
            confirm_password: "analytical".to_string(),
        };
        assert!(form.validate().is_ok());

        form.confirm_password = "analytic".to_string();
        form.surname = " ".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingField("Surname"),
                ValidationError::PasswordMismatch
            ]
        );
        assert_eq!(errors[0].to_string(), "Surname is required");
    }

    #[test]
    fn test_reset_form() {
        assert!(ResetPasswordForm::new("someone@example.com").validate().is_ok());
        assert_eq!(
            ResetPasswordForm::default().validate().unwrap_err(),
            vec![ValidationError::EmailRequired]
        );
    }
}
