use once_cell::sync::Lazy;
use regex::Regex;

// not `validator::ValidateEmail`: that one accepts dotless domains like
// `user@localhost`. we only want `local@domain.tld` with no whitespace anywhere;
// deliverability is the collector's problem
//
// "whitespace" is the browser's `\s`, not unicode White_Space: U+FEFF counts,
// U+0085 doesn't
const WHITESPACE: &str = r"\t\n\x{0B}\x{0C}\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    let part = format!("[^@{WHITESPACE}]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern must compile")
});

/// Syntactic sanity check only: no whitespace, an `@`, and a `.` somewhere
/// after the `@`.
pub fn is_valid_email(candidate: &str) -> bool { EMAIL_SHAPE.is_match(candidate) }

#[derive(Debug, Clone, PartialEq, Eq)]
/// An address that passed `is_valid_email`. Only constructed through `parse`,
/// so anything holding one can send it without checking again.
pub struct WaitlistEmail(String);

impl WaitlistEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        match is_valid_email(&email) {
            true => Ok(Self(email)),
            false => Err(format!("Invalid email: {email:?}")),
        }
    }
}

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl From<WaitlistEmail> for String {
    fn from(value: WaitlistEmail) -> Self { value.0 }
}
