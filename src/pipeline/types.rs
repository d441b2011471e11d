//! Shared types for the scan pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PayloadDiagnostic;

// ── Payload ─────────────────────────────────────────────────────────

/// Raw decoded text carried by one optical code.
///
/// Two payloads are the same iff their text is byte-for-byte equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    text: String,
}

impl Payload {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self { text }
    }
}

// ── Category ────────────────────────────────────────────────────────

/// Semantic bucket assigned to a payload. `Text` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Url,
    WifiConfig,
    VCard,
    Sms,
    Email,
    PhoneNumber,
    Geo,
    Text,
}

impl Category {
    /// Every category, in rule-precedence order.
    pub const ALL: [Category; 8] = [
        Category::Url,
        Category::WifiConfig,
        Category::VCard,
        Category::Sms,
        Category::Email,
        Category::PhoneNumber,
        Category::Geo,
        Category::Text,
    ];

    /// Human-readable name used in overlay labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::WifiConfig => "WiFi Config",
            Self::VCard => "vCard (Contact)",
            Self::Sms => "SMS",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone Number",
            Self::Geo => "Geo",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ── Classifier trait ────────────────────────────────────────────────

/// Maps a payload string to exactly one category.
///
/// Implementations must be total: any string, including the empty one,
/// yields a category and never panics. The pipeline only sees this trait,
/// so strategies can be swapped without touching downstream stages.
pub trait Classifier: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    fn classify(&self, text: &str) -> Category;
}

// ── Parsed fields ───────────────────────────────────────────────────

/// Which source form an email payload arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailFormat {
    /// `mailto:` URI, passed through untouched.
    Mailto,
    /// `MATMSG:TO:..;SUB:..;BODY:..;;` record.
    Matmsg,
    /// Classified as email but matches neither form.
    Unrecognized,
}

/// WiFi credentials from a `WIFI:S:..;T:..;P:..;;` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    pub auth_type: String,
    pub password: String,
}

/// Recipient, subject and body of an email payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailFields {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub format: EmailFormat,
}

/// Category-tagged structured fields.
///
/// The variant always matches the category that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ParsedFields {
    Url { text: String },
    WifiConfig(WifiCredentials),
    VCard { text: String },
    Sms { text: String },
    Email(EmailFields),
    PhoneNumber { text: String },
    Geo { coordinates: String },
    Text { text: String },
}

impl ParsedFields {
    /// The category this field set belongs to.
    pub fn category(&self) -> Category {
        match self {
            Self::Url { .. } => Category::Url,
            Self::WifiConfig(_) => Category::WifiConfig,
            Self::VCard { .. } => Category::VCard,
            Self::Sms { .. } => Category::Sms,
            Self::Email(_) => Category::Email,
            Self::PhoneNumber { .. } => Category::PhoneNumber,
            Self::Geo { .. } => Category::Geo,
            Self::Text { .. } => Category::Text,
        }
    }
}

// ── Action ──────────────────────────────────────────────────────────

/// A side effect the host should perform. The engine never performs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Open a URL in the system browser (web, mailto or maps link).
    OpenLink { url: String },
    /// Put text on the clipboard.
    CopyToClipboard { text: String },
    /// Ask the user a yes/no question; the answer is only logged.
    ConfirmAndLog {
        prompt: String,
        on_accept: String,
        on_decline: String,
    },
    /// Display only.
    NoAction,
}

impl Action {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenLink { .. } => "open_link",
            Self::CopyToClipboard { .. } => "copy_to_clipboard",
            Self::ConfirmAndLog { .. } => "confirm_and_log",
            Self::NoAction => "no_action",
        }
    }

    /// Record the user's answer to a `ConfirmAndLog` prompt.
    ///
    /// Logs and returns the matching message; `None` for every other action.
    pub fn settle(&self, accepted: bool) -> Option<&str> {
        match self {
            Self::ConfirmAndLog {
                on_accept,
                on_decline,
                ..
            } => {
                let message = if accepted { on_accept } else { on_decline };
                tracing::info!(accepted, "{}", message);
                Some(message)
            }
            _ => None,
        }
    }
}

// ── Scan result ─────────────────────────────────────────────────────

/// Everything the engine knows about one payload in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub payload: Payload,
    pub category: Category,
    pub fields: ParsedFields,
    /// Never empty; `[NoAction]` when nothing should happen.
    pub actions: Vec<Action>,
    /// The payload was already actioned earlier in this live session.
    pub suppressed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<PayloadDiagnostic>,
}

impl ScanResult {
    /// Overlay label, e.g. `[URL] https://example.com`.
    pub fn label(&self) -> String {
        format!("[{}] {}", self.category, self.payload.text())
    }

    /// Whether the host has anything to execute for this payload.
    pub fn is_actionable(&self) -> bool {
        self.actions.iter().any(|a| *a != Action::NoAction)
    }
}
