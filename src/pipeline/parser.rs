//! Structured field extraction for the compact QR mini-formats.
//!
//! Parsing never fails. Sub-fields that are missing or unparseable default
//! to empty strings; what went wrong is reported as a `PayloadDiagnostic`
//! next to the fields.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::PayloadDiagnostic;
use crate::pipeline::types::{Category, EmailFields, EmailFormat, ParsedFields, WifiCredentials};

const WIFI_PREFIX: &str = "WIFI:";
const MATMSG_PREFIX: &str = "MATMSG:";
const MAILTO_PREFIX: &str = "mailto:";
pub(crate) const GEO_PREFIX: &str = "geo:";

static MATMSG_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TO:([^;]+)").expect("MATMSG TO pattern is valid"));
static MATMSG_SUB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SUB:([^;]*)").expect("MATMSG SUB pattern is valid"));
static MATMSG_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BODY:([^;]*)").expect("MATMSG BODY pattern is valid"));

/// Parsed fields plus whatever did not match along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub fields: ParsedFields,
    pub diagnostics: Vec<PayloadDiagnostic>,
}

/// Extract the structured fields for `category` from `text`.
pub fn parse(text: &str, category: Category) -> ParsedFields {
    parse_with_diagnostics(text, category).fields
}

/// Like [`parse`], but also returns diagnostics for partial matches.
pub fn parse_with_diagnostics(text: &str, category: Category) -> ParseOutcome {
    let mut diagnostics = Vec::new();

    let fields = match category {
        Category::WifiConfig => ParsedFields::WifiConfig(parse_wifi(text, &mut diagnostics)),
        Category::Email => ParsedFields::Email(parse_email(text, &mut diagnostics)),
        Category::Geo => ParsedFields::Geo {
            coordinates: parse_geo(text, &mut diagnostics),
        },
        Category::Url => ParsedFields::Url { text: text.into() },
        Category::VCard => ParsedFields::VCard { text: text.into() },
        Category::Sms => ParsedFields::Sms { text: text.into() },
        Category::PhoneNumber => ParsedFields::PhoneNumber { text: text.into() },
        Category::Text => ParsedFields::Text { text: text.into() },
    };

    for diagnostic in &diagnostics {
        warn!(%category, payload_len = text.len(), "{}", diagnostic);
    }

    ParseOutcome {
        fields,
        diagnostics,
    }
}

/// `WIFI:S:<ssid>;T:<auth>;P:<password>;;`
///
/// Segments are split on `;`; unknown keys are ignored and the last
/// occurrence of a repeated key wins.
fn parse_wifi(text: &str, diagnostics: &mut Vec<PayloadDiagnostic>) -> WifiCredentials {
    let mut credentials = WifiCredentials::default();

    let Some(body) = text.strip_prefix(WIFI_PREFIX) else {
        diagnostics.push(PayloadDiagnostic::MissingPrefix {
            category: Category::WifiConfig,
            expected: WIFI_PREFIX,
        });
        return credentials;
    };

    for segment in body.split(';') {
        if let Some(ssid) = segment.strip_prefix("S:") {
            credentials.ssid = ssid.to_string();
        } else if let Some(auth_type) = segment.strip_prefix("T:") {
            credentials.auth_type = auth_type.to_string();
        } else if let Some(password) = segment.strip_prefix("P:") {
            credentials.password = password.to_string();
        }
    }

    // Open networks legitimately omit T and P; only the SSID is expected.
    if credentials.ssid.is_empty() {
        diagnostics.push(PayloadDiagnostic::MissingField {
            category: Category::WifiConfig,
            field: "ssid",
        });
    }

    credentials
}

fn parse_email(text: &str, diagnostics: &mut Vec<PayloadDiagnostic>) -> EmailFields {
    if text.starts_with(MAILTO_PREFIX) {
        return EmailFields {
            to: text.to_string(),
            subject: String::new(),
            body: String::new(),
            format: EmailFormat::Mailto,
        };
    }

    if text.starts_with(MATMSG_PREFIX) {
        let to = capture(&MATMSG_TO, text);
        if to.is_empty() {
            diagnostics.push(PayloadDiagnostic::MissingField {
                category: Category::Email,
                field: "to",
            });
        }
        return EmailFields {
            to,
            subject: capture(&MATMSG_SUB, text),
            body: capture(&MATMSG_BODY, text),
            format: EmailFormat::Matmsg,
        };
    }

    diagnostics.push(PayloadDiagnostic::UnrecognizedEmailFormat);
    EmailFields {
        to: String::new(),
        subject: String::new(),
        body: String::new(),
        format: EmailFormat::Unrecognized,
    }
}

/// `geo:<lat>,<lon>` — the remainder is kept verbatim.
fn parse_geo(text: &str, diagnostics: &mut Vec<PayloadDiagnostic>) -> String {
    match text.strip_prefix(GEO_PREFIX) {
        Some("") => {
            diagnostics.push(PayloadDiagnostic::MissingField {
                category: Category::Geo,
                field: "coordinates",
            });
            String::new()
        }
        Some(coordinates) => coordinates.to_string(),
        None => {
            diagnostics.push(PayloadDiagnostic::MissingPrefix {
                category: Category::Geo,
                expected: GEO_PREFIX,
            });
            String::new()
        }
    }
}

/// First capture group of the first match, or empty.
fn capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wifi(text: &str) -> WifiCredentials {
        match parse(text, Category::WifiConfig) {
            ParsedFields::WifiConfig(creds) => creds,
            other => panic!("Expected WifiConfig, got {:?}", other),
        }
    }

    fn email(text: &str) -> EmailFields {
        match parse(text, Category::Email) {
            ParsedFields::Email(fields) => fields,
            other => panic!("Expected Email, got {:?}", other),
        }
    }

    #[test]
    fn parses_full_wifi_record() {
        let creds = wifi("WIFI:S:Home;T:WPA;P:secret;;");
        assert_eq!(creds.ssid, "Home");
        assert_eq!(creds.auth_type, "WPA");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn wifi_missing_keys_default_to_empty() {
        let creds = wifi("WIFI:T:WPA;;");
        assert_eq!(
            creds,
            WifiCredentials {
                ssid: String::new(),
                auth_type: "WPA".into(),
                password: String::new(),
            }
        );
    }

    #[test]
    fn wifi_ignores_unknown_segments_and_order() {
        let creds = wifi("WIFI:P:pw;H:true;S:Cafe;X:whatever;;");
        assert_eq!(creds.ssid, "Cafe");
        assert_eq!(creds.password, "pw");
        assert_eq!(creds.auth_type, "");
    }

    #[test]
    fn wifi_keeps_colons_inside_values() {
        let creds = wifi("WIFI:S:Home;T:WPA;P:a:b:c;;");
        assert_eq!(creds.password, "a:b:c");
    }

    #[test]
    fn wifi_missing_ssid_is_diagnosed() {
        let outcome = parse_with_diagnostics("WIFI:T:WPA;;", Category::WifiConfig);
        assert_eq!(
            outcome.diagnostics,
            vec![PayloadDiagnostic::MissingField {
                category: Category::WifiConfig,
                field: "ssid",
            }]
        );
    }

    #[test]
    fn wifi_without_prefix_yields_empty_fields() {
        let outcome = parse_with_diagnostics("WIFI", Category::WifiConfig);
        assert_eq!(
            outcome.fields,
            ParsedFields::WifiConfig(WifiCredentials::default())
        );
        assert!(matches!(
            outcome.diagnostics.as_slice(),
            [PayloadDiagnostic::MissingPrefix { .. }]
        ));
    }

    #[test]
    fn complete_wifi_record_has_no_diagnostics() {
        let outcome = parse_with_diagnostics("WIFI:S:Home;T:WPA;P:secret;;", Category::WifiConfig);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn parses_matmsg() {
        let fields = email("MATMSG:TO:a@b.com;SUB:Hi;BODY:Hello;;");
        assert_eq!(fields.to, "a@b.com");
        assert_eq!(fields.subject, "Hi");
        assert_eq!(fields.body, "Hello");
        assert_eq!(fields.format, EmailFormat::Matmsg);
    }

    #[test]
    fn matmsg_missing_subject_and_body_default_to_empty() {
        let fields = email("MATMSG:TO:a@b.com;;");
        assert_eq!(fields.to, "a@b.com");
        assert_eq!(fields.subject, "");
        assert_eq!(fields.body, "");
    }

    #[test]
    fn matmsg_allows_empty_subject() {
        let fields = email("MATMSG:TO:a@b.com;SUB:;BODY:Hello;;");
        assert_eq!(fields.subject, "");
        assert_eq!(fields.body, "Hello");
    }

    #[test]
    fn matmsg_missing_recipient_is_diagnosed() {
        let outcome = parse_with_diagnostics("MATMSG:SUB:Hi;BODY:Hello;;", Category::Email);
        match &outcome.fields {
            ParsedFields::Email(fields) => assert_eq!(fields.to, ""),
            other => panic!("Expected Email, got {:?}", other),
        }
        assert_eq!(
            outcome.diagnostics,
            vec![PayloadDiagnostic::MissingField {
                category: Category::Email,
                field: "to",
            }]
        );
    }

    #[test]
    fn mailto_passes_through() {
        let fields = email("mailto:someone@example.com?subject=Hi");
        assert_eq!(fields.to, "mailto:someone@example.com?subject=Hi");
        assert_eq!(fields.subject, "");
        assert_eq!(fields.body, "");
        assert_eq!(fields.format, EmailFormat::Mailto);
    }

    #[test]
    fn unrecognized_email_form() {
        let outcome = parse_with_diagnostics("someone@example.com", Category::Email);
        match &outcome.fields {
            ParsedFields::Email(fields) => assert_eq!(fields.format, EmailFormat::Unrecognized),
            other => panic!("Expected Email, got {:?}", other),
        }
        assert_eq!(
            outcome.diagnostics,
            vec![PayloadDiagnostic::UnrecognizedEmailFormat]
        );
    }

    #[test]
    fn geo_strips_prefix_verbatim() {
        assert_eq!(
            parse("geo:37.7749,-122.4194", Category::Geo),
            ParsedFields::Geo {
                coordinates: "37.7749,-122.4194".into()
            }
        );
        // No numeric validation
        assert_eq!(
            parse("geo:not,numbers", Category::Geo),
            ParsedFields::Geo {
                coordinates: "not,numbers".into()
            }
        );
    }

    #[test]
    fn geo_without_prefix_is_empty() {
        let outcome = parse_with_diagnostics("37.7749,-122.4194", Category::Geo);
        assert_eq!(
            outcome.fields,
            ParsedFields::Geo {
                coordinates: String::new()
            }
        );
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn geo_with_empty_remainder_is_diagnosed() {
        let outcome = parse_with_diagnostics("geo:", Category::Geo);
        assert_eq!(
            outcome.fields,
            ParsedFields::Geo {
                coordinates: String::new()
            }
        );
        assert_eq!(
            outcome.diagnostics,
            vec![PayloadDiagnostic::MissingField {
                category: Category::Geo,
                field: "coordinates",
            }]
        );
    }

    #[test]
    fn raw_categories_keep_text() {
        assert_eq!(
            parse("tel:+977", Category::PhoneNumber),
            ParsedFields::PhoneNumber {
                text: "tel:+977".into()
            }
        );
        assert_eq!(
            parse("SMSTO:+1:hi", Category::Sms),
            ParsedFields::Sms {
                text: "SMSTO:+1:hi".into()
            }
        );
        assert_eq!(
            parse("", Category::Text),
            ParsedFields::Text {
                text: String::new()
            }
        );
    }

    #[test]
    fn variant_always_matches_category() {
        for category in Category::ALL {
            for text in ["", "garbage", "WIFI:;;", "MATMSG:", "geo:"] {
                assert_eq!(parse(text, category).category(), category);
            }
        }
    }
}
