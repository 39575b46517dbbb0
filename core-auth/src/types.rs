use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Credential issued by an identity provider.
///
/// Contains the access token, the refresh token and the access token
/// expiration for an authenticated session. Any additional fields the provider
/// returns (`idToken`, `tokenType`, `additionalParameters`, ...) are kept in
/// [`extra`](Self::extra) and written back unmodified.
///
/// The serialized form uses camelCase keys:
///
/// ```json
/// {
///   "accessToken": "ya29.a0...",
///   "refreshToken": "1//0g...",
///   "accessTokenExpirationDate": "2024-05-09T20:35:09Z",
///   "idToken": "eyJhbGciOi..."
/// }
/// ```
///
/// # Security
///
/// Tokens should be stored securely and never logged. The `Debug`
/// implementation redacts them.
///
/// # Examples
///
/// ```
/// use core_auth::Credential;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// let credential = Credential::new(
///     "access".to_string(),
///     Some("refresh".to_string()),
///     Some(now + Duration::hours(1)),
/// );
///
/// assert!(!credential.is_expired_at(now));
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain a new credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When the access token expires (UTC)
    #[serde(default, with = "expiration", skip_serializing_if = "Option::is_none")]
    pub access_token_expiration_date: Option<DateTime<Utc>>,
    /// Provider-specific fields, passed through unmodified
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// Create a credential without provider-specific fields
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        access_token_expiration_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_token_expiration_date,
            extra: Map::new(),
        }
    }

    /// Attach a provider-specific field
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Check whether the access token expired before `now`
    ///
    /// This is a strict comparison with no clock-skew buffer: a token whose
    /// expiration equals `now` is still considered valid. A credential without
    /// an expiration never expires.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_auth::Credential;
    /// use chrono::{Duration, Utc};
    ///
    /// let now = Utc::now();
    /// let credential = Credential::new("a".into(), None, Some(now - Duration::seconds(1)));
    /// assert!(credential.is_expired_at(now));
    /// assert!(!credential.is_expired_at(now - Duration::seconds(1)));
    /// ```
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token_expiration_date
            .map(|expires_at| expires_at < now)
            .unwrap_or(false)
    }

    /// Get the time remaining until expiration
    ///
    /// Returns `None` if the token has no expiration or is already expired.
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let expires_at = self.access_token_expiration_date?;
        if now >= expires_at {
            None
        } else {
            Some(expires_at - now)
        }
    }

    /// The OpenID Connect ID token, if the provider returned one
    pub fn id_token(&self) -> Option<&str> {
        self.extra.get("idToken").and_then(Value::as_str)
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "access_token_expiration_date",
                &self.access_token_expiration_date,
            )
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// (De)serialization of the expiration timestamp.
///
/// Written as RFC 3339 with full sub-second precision. Read from an ISO-8601
/// string (RFC 3339, `+hhmm` offsets, local date-times and bare dates, the
/// latter two taken as UTC) or a number of milliseconds since the Unix epoch.
///
/// A value that can't be read as a date becomes `None`, so the credential is
/// kept and never considered expired.
mod expiration {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawExpiration {
        Millis(i64),
        FractionalMillis(f64),
        Text(String),
        Other(IgnoredAny),
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawExpiration>::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let parsed = match raw {
            RawExpiration::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
            RawExpiration::FractionalMillis(ms) if ms.is_finite() => {
                Utc.timestamp_millis_opt(ms as i64).single()
            }
            RawExpiration::FractionalMillis(_) => None,
            RawExpiration::Text(text) => parse_text(text.trim()),
            RawExpiration::Other(_) => None,
        };

        if parsed.is_none() {
            warn!("Unreadable accessTokenExpirationDate, treating credential as non-expiring");
        }
        Ok(parsed)
    }

    fn parse_text(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(text) {
            return Some(at.with_timezone(&Utc));
        }
        if let Ok(at) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(at.with_timezone(&Utc));
        }
        if let Ok(at) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(at.and_utc());
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|at| at.and_utc())
    }
}

/// Authentication state shown by the presentation layer.
///
/// # Examples
///
/// ```
/// use core_auth::AuthState;
///
/// assert!(!AuthState::SignedOut.is_authenticated());
/// assert!(AuthState::SignedIn.is_authenticated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthState {
    /// No credential is shown
    #[default]
    SignedOut,
    /// A credential is shown
    SignedIn,
}

impl AuthState {
    /// Check if the user is authenticated
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::SignedIn)
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::SignedOut => write!(f, "Signed Out"),
            AuthState::SignedIn => write!(f, "Signed In"),
        }
    }
}
