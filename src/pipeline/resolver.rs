//! Action resolver — turns a classified, parsed payload into action intents.
//!
//! | Category    | Actions                              |
//! |-------------|--------------------------------------|
//! | Url         | OpenLink + CopyToClipboard           |
//! | WifiConfig  | ConfirmAndLog (credentials prompt)   |
//! | Email       | OpenLink (mailto URI)                |
//! | Geo         | OpenLink (map search)                |
//! | others      | NoAction                             |
//!
//! Nothing here executes an action; the host decides how and whether to.

use tracing::debug;

use crate::pipeline::parser::GEO_PREFIX;
use crate::pipeline::types::{
    Action, Category, EmailFields, EmailFormat, ParsedFields, Payload, WifiCredentials,
};

/// Map search endpoint the coordinates are appended to.
pub const DEFAULT_MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Resolves actions with a configurable map search endpoint.
#[derive(Debug, Clone)]
pub struct ActionResolver {
    maps_search_url: String,
}

impl ActionResolver {
    pub fn new(maps_search_url: impl Into<String>) -> Self {
        Self {
            maps_search_url: maps_search_url.into(),
        }
    }

    /// Actions for one payload. Never empty: `[NoAction]` when nothing applies.
    pub fn resolve(&self, category: Category, fields: &ParsedFields, raw: &Payload) -> Vec<Action> {
        let actions = match (category, fields) {
            (Category::Url, ParsedFields::Url { .. }) => vec![
                Action::OpenLink {
                    url: raw.text().to_string(),
                },
                Action::CopyToClipboard {
                    text: raw.text().to_string(),
                },
            ],
            (Category::WifiConfig, ParsedFields::WifiConfig(creds)) => {
                vec![wifi_confirmation(creds)]
            }
            (Category::Email, ParsedFields::Email(email)) => match mailto_link(email, raw) {
                Some(url) => vec![Action::OpenLink { url }],
                None => vec![Action::NoAction],
            },
            // A bare `geo:` still opens the map; only text without the prefix is skipped.
            (Category::Geo, ParsedFields::Geo { coordinates })
                if !coordinates.is_empty() || raw.text().starts_with(GEO_PREFIX) =>
            {
                vec![Action::OpenLink {
                    url: format!("{}{}", self.maps_search_url, coordinates),
                }]
            }
            _ => vec![Action::NoAction],
        };

        debug!(
            %category,
            actions = ?actions.iter().map(Action::label).collect::<Vec<_>>(),
            "Resolved actions"
        );
        actions
    }
}

impl Default for ActionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAPS_SEARCH_URL)
    }
}

/// Resolve with the default map search endpoint.
pub fn resolve(category: Category, fields: &ParsedFields, raw: &Payload) -> Vec<Action> {
    ActionResolver::default().resolve(category, fields, raw)
}

fn wifi_confirmation(creds: &WifiCredentials) -> Action {
    Action::ConfirmAndLog {
        prompt: format!(
            "SSID: {}\nAuthentication: {}\nPassword: {}\n\nConnect to this WiFi network?",
            creds.ssid, creds.auth_type, creds.password
        ),
        on_accept: format!("User agreed to connect to WiFi SSID: {}", creds.ssid),
        on_decline: "User declined WiFi connection.".to_string(),
    }
}

/// `mailto:` URI for an email payload, if one can be built.
fn mailto_link(email: &EmailFields, raw: &Payload) -> Option<String> {
    match email.format {
        EmailFormat::Mailto => Some(raw.text().to_string()),
        EmailFormat::Matmsg if !email.to.is_empty() => Some(format!(
            "mailto:{}?subject={}&body={}",
            email.to, email.subject, email.body
        )),
        EmailFormat::Matmsg | EmailFormat::Unrecognized => None,
    }
}
