#[cfg(test)]
#[path = "judge_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ActionRequest;
use crate::domain::models::ActionResponse;
use crate::domain::models::Backend;
use crate::domain::services::TokenProvider;

const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Deserialize)]
struct ChatspaceResponse {
    chatspace_uuid: Option<String>,
}

/// HTTP client for the judge's problem API.
pub struct Judge {
    url: String,
    token: TokenProvider,
    cookie_name: String,
    timeout: String,
}

impl Default for Judge {
    fn default() -> Judge {
        return Judge {
            url: Config::get(ConfigKey::BaseUrl),
            token: TokenProvider::from_config(),
            cookie_name: Config::get(ConfigKey::CsrfCookieName),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

impl Judge {
    fn endpoint(&self, path: &str) -> String {
        return format!("{}{path}", self.url.trim_end_matches('/'));
    }

    fn post(&self, path: &str) -> Result<reqwest::RequestBuilder> {
        let url = self.endpoint(path);
        let mut req = reqwest::Client::new()
            .post(&url)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .header(reqwest::header::REFERER, &url);

        // Without a token the server gets to reject the request itself.
        if let Some(token) = self.token.get_token(&self.cookie_name) {
            req = req.header(CSRF_HEADER, token);
        }
        if !self.token.cookies().is_empty() {
            req = req.header(reqwest::header::COOKIE, self.token.cookies());
        }

        return Ok(req);
    }
}

#[async_trait]
impl Backend for Judge {
    #[allow(clippy::implicit_return)]
    async fn post_action(
        &self,
        problem_id: &str,
        request: &ActionRequest,
    ) -> Result<ActionResponse> {
        let path = format!("/problem/api/{}/", urlencoding::encode(problem_id));
        let res = self.post(&path)?.json(request).send().await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                action = %request.action,
                problem_id,
                "Judge rejected the action request"
            );
            bail!(format!("Judge responded with {}", res.status()));
        }

        let body = res.json::<ActionResponse>().await?;
        tracing::debug!(body = ?body, "Action response");

        return Ok(body);
    }

    #[allow(clippy::implicit_return)]
    async fn create_chatspace(&self) -> Result<String> {
        let res = self.post("/problem/api/chatspace/")?.send().await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Judge rejected the chat session request"
            );
            bail!(format!("Judge responded with {}", res.status()));
        }

        let body = res.json::<ChatspaceResponse>().await?;
        match body.chatspace_uuid {
            Some(uuid) if !uuid.is_empty() => return Ok(uuid),
            _ => bail!("Judge did not return a chat session id"),
        }
    }
}
