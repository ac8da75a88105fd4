use once_cell::sync::Lazy;
use regex::Regex;

/// Syntax-only email check gating "send OTP".
///
/// Same shape the backend expects: one `@`, no whitespace, and a dot
/// somewhere in the domain part. Deliverability is the server's problem.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("you@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
    }

    #[test]
    fn rejects_missing_at_or_domain_dot() {
        assert!(!is_valid_email("example.com"));
        assert!(!is_valid_email("you@localhost"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn rejects_whitespace_and_double_at() {
        assert!(!is_valid_email("you @example.com"));
        assert!(!is_valid_email("you@ex ample.com"));
        assert!(!is_valid_email("you@@example.com"));
        assert!(!is_valid_email("you@example.com "));
    }
}
