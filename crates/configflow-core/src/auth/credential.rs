/// A raw credential, classified by shape before any verification.
///
/// Classification is purely syntactic: a value with exactly three non-empty
/// base64url segments separated by `.` is a session token, anything else is
/// treated as an API key. A credential classified as a session token is never
/// retried as an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    SessionToken(&'a str),
    ApiKey(&'a str),
}

impl<'a> Credential<'a> {
    /// Classify a raw credential. Returns `None` for an empty or blank value.
    pub fn classify(raw: &'a str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if is_jwt_shaped(raw) {
            Some(Credential::SessionToken(raw))
        } else {
            Some(Credential::ApiKey(raw))
        }
    }

    /// Extract and classify the credential from an `Authorization` header
    /// value of the form `Bearer <credential>`.
    pub fn from_authorization(header: &'a str) -> Option<Self> {
        let (scheme, rest) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        Self::classify(rest)
    }
}

fn is_jwt_shaped(raw: &str) -> bool {
    let mut segments = 0;
    for segment in raw.split('.') {
        if segment.is_empty() || !segment.bytes().all(is_base64url) {
            return false;
        }
        segments += 1;
    }
    segments == 3
}

fn is_base64url(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
