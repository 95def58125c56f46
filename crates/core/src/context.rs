use serde::{Deserialize, Serialize};

/// Per-request settings an import runs under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportContext {
    /// Display language the user configured; empty when unset.
    pub user_language: String,
    /// Locale reported by the requesting client.
    pub client_locale: String,
    /// Minutes east of UTC that naive transaction times are expressed in.
    pub timezone_offset_minutes: i32,
}

impl ImportContext {
    pub fn new(user_language: &str, client_locale: &str, timezone_offset_minutes: i32) -> Self {
        Self {
            user_language: user_language.to_string(),
            client_locale: client_locale.to_string(),
            timezone_offset_minutes,
        }
    }

    /// The user's configured language, falling back to the client locale.
    pub fn display_language(&self) -> &str {
        if self.user_language.is_empty() {
            &self.client_locale
        } else {
            &self.user_language
        }
    }
}
