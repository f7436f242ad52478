//! Field checks used by the quote form.
//!
//! These only drive visual feedback; a failing check never blocks a
//! submission on its own.

use std::sync::LazyLock;

use regex::Regex;

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static PINCODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const PHONE_LEN: usize = 10;
pub const PINCODE_LEN: usize = 6;

/// Exactly ten digits.
pub fn validate_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

/// Exactly six digits.
pub fn validate_pincode(pincode: &str) -> bool {
    PINCODE.is_match(pincode)
}

/// Basic `local@domain.tld` shape, no whitespace.
pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Strip every non-digit and keep at most `max_len` digits, the way the
/// phone and pincode inputs reformat themselves while typing.
pub fn digits_only(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(max_len)
        .collect()
}

/// Outcome of validating one field on blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFeedback {
    Valid,
    Invalid,
}

impl FieldFeedback {
    pub fn from_check(ok: bool) -> Self {
        if ok { Self::Valid } else { Self::Invalid }
    }

    /// Border colour the form applies for this state.
    pub fn border_color(self) -> &'static str {
        match self {
            Self::Valid => "#10b981",
            Self::Invalid => "#ef4444",
        }
    }
}
