#[cfg(test)]
#[path = "token_test.rs"]
mod tests;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Source of the anti-forgery token attached to mutating requests.
#[derive(Clone, Debug, Default)]
pub struct TokenProvider {
    form_token: String,
    cookies: String,
}

impl TokenProvider {
    pub fn new(form_token: &str, cookies: &str) -> TokenProvider {
        return TokenProvider {
            form_token: form_token.to_string(),
            cookies: cookies.to_string(),
        };
    }

    pub fn from_config() -> TokenProvider {
        return TokenProvider::new(
            &Config::get(ConfigKey::CsrfToken),
            &Config::get(ConfigKey::Cookie),
        );
    }

    /// Returns the embedded form token if there is one, otherwise the value
    /// of the named cookie.
    pub fn get_token(&self, cookie_name: &str) -> Option<String> {
        if !self.form_token.is_empty() {
            return Some(self.form_token.to_string());
        }

        let prefix = format!("{cookie_name}=");
        let raw = self
            .cookies
            .split(';')
            .map(|cookie| return cookie.trim())
            .find(|cookie| return cookie.starts_with(&prefix))?
            .strip_prefix(&prefix)?;

        match urlencoding::decode(raw) {
            Ok(value) => return Some(value.into_owned()),
            Err(err) => {
                tracing::warn!(error = ?err, cookie = cookie_name, "Cookie is not valid UTF-8 once decoded");
                return Some(raw.to_string());
            }
        }
    }

    pub fn cookies(&self) -> &str {
        return &self.cookies;
    }
}
