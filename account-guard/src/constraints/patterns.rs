//! Process-wide format patterns used by the type classifier.
//!
//! Each pattern is compiled on first use and shared for the life of the
//! process.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    // Hard-coded patterns, covered by the tests below
    #[allow(clippy::expect_used)]
    Regex::new(pattern).expect("Hard-coded regex pattern should be valid")
}

/// `local@domain.tld` with an ASCII local part and a TLD of two or more letters.
pub static EMAIL: Lazy<Regex> =
    Lazy::new(|| compile(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"));

/// North-American style number: optional `+1`/`1`, optional separators and
/// parenthesized area code, then 3+3+4 digits.
pub static PHONE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\+?1?[-.\s]?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}$")
});

/// Canonical 8-4-4-4-12 lowercase hex grouping. Callers lowercase first.
pub static UUID: Lazy<Regex> = Lazy::new(|| {
    compile(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
});

/// Dotted-quad IPv4 with each octet in 0..=255.
pub static IPV4: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
});

/// Fully expanded eight-group IPv6. Compressed (`::`) and IPv4-embedded
/// forms do not match.
pub static IPV6: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$"));
