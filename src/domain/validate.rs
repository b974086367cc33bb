//! Field-format checks for teller-entered customer data.
//!
//! The rules are deliberately narrow: a phone number is exactly ten ASCII
//! digits with a leading 6-9 (Indian mobile numbering), and an email is
//! `local@host.tld` where local and host use word characters, dots and
//! dashes, and the TLD is 2-6 letters.

/// Characters allowed in the local and host parts of an email address.
fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

/// Check a customer phone number: ten digits, first one 6-9.
pub fn is_valid_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 10
        && matches!(bytes[0], b'6'..=b'9')
        && bytes.iter().all(|b| b.is_ascii_digit())
}

/// Check a customer email address.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(is_email_char) {
        return false;
    }
    // A second '@' makes the domain invalid via the character check below.
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty() || !host.chars().all(is_email_char) {
        return false;
    }
    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}
