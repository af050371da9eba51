//! Contact form validation and the `mailto:` link it produces

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ContactConfig;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

pub const MISSING_FIELDS: &str = "Bitte fülle alle Felder aus.";
pub const INVALID_EMAIL: &str = "Bitte gib eine gültige E-Mail-Adresse ein.";
pub const MAIL_CLIENT_OPENING: &str = "E-Mail-Client wird geöffnet! 📧";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// Result of a submission, shown as a toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactOutcome {
    pub kind: MessageKind,
    pub message: String,
    /// Link handed to the visitor's mail client on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,
}

impl ContactOutcome {
    fn error(message: &str) -> Self {
        Self {
            kind: MessageKind::Error,
            message: message.to_string(),
            mailto: None,
        }
    }
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Validate the form and build the mail link. Nothing is sent.
#[must_use]
pub fn submit(form: &ContactForm, config: &ContactConfig) -> ContactOutcome {
    let name = form.name.trim();
    let email = form.email.trim();
    let message = form.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return ContactOutcome::error(MISSING_FIELDS);
    }
    if !is_valid_email(email) {
        return ContactOutcome::error(INVALID_EMAIL);
    }

    let subject = format!("Message from {name} via Portfolio");
    let body = format!(
        "Hi {},\n\n{message}\n\nBest regards,\n{name}\n\n---\nEmail: {email}\nSent via your portfolio contact form",
        config.owner_name
    );

    ContactOutcome {
        kind: MessageKind::Success,
        message: MAIL_CLIENT_OPENING.to_string(),
        mailto: Some(format!(
            "mailto:{}?subject={}&body={}",
            config.recipient,
            urlencoding::encode(&subject),
            urlencoding::encode(&body)
        )),
    }
}
