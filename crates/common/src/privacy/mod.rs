//! Privacy helpers for log output
//!
//! Tokens and email addresses are never written to logs verbatim. These
//! helpers keep enough of the value to correlate log lines without exposing
//! it.

/// Redact a bearer or refresh token, keeping a short prefix and the length
///
/// ```
/// use visadesk_common::privacy::redact_token;
///
/// assert_eq!(redact_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJh…(28 chars)");
/// assert_eq!(redact_token(""), "<empty>");
/// ```
pub fn redact_token(token: &str) -> String {
    if token.is_empty() {
        return "<empty>".to_string();
    }
    let len = token.chars().count();
    if len <= 8 {
        return format!("…({len} chars)");
    }
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}…({len} chars)")
}

/// Mask the local part of an email address
///
/// ```
/// use visadesk_common::privacy::mask_email;
///
/// assert_eq!(mask_email("ana.silva@example.com"), "a********@example.com");
/// assert_eq!(mask_email("not-an-email"), "<redacted>");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let mut chars = local.chars();
            let first = chars.next().unwrap_or('*');
            let hidden = "*".repeat(chars.count());
            format!("{first}{hidden}@{domain}")
        }
        _ => "<redacted>".to_string(),
    }
}

/// Mask a client-link token for log fields (tokens grant form access)
pub fn mask_link_token(token: &str) -> String {
    let visible: String = token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{visible}")
    }
}
