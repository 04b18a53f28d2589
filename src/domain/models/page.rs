#[cfg(test)]
#[path = "page_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use url::Url;

pub const SESSION_QUERY_KEY: &str = "cs";

/// Address of the problem page. Carries the problem id in its path and the
/// resumable chat session id in its `cs` query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn new(base_url: &str, problem_id: &str, session_id: &str) -> Result<PageLocation> {
        let mut url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            bail!(format!("{base_url} is not a valid judge URL"));
        }

        url.set_path(&format!("/problem/{problem_id}/"));
        url.set_query(None);
        url.set_fragment(None);

        let mut page = PageLocation { url };
        if !session_id.is_empty() {
            page.replace_session(session_id);
        }

        return Ok(page);
    }

    pub fn parse(page_url: &str) -> Result<PageLocation> {
        let url = Url::parse(page_url)?;
        if url.cannot_be_a_base() {
            bail!(format!("{page_url} is not a valid problem page URL"));
        }

        return Ok(PageLocation { url });
    }

    pub fn as_str(&self) -> &str {
        return self.url.as_str();
    }

    /// Site root the API and channel endpoints hang off.
    pub fn base_url(&self) -> Url {
        let mut base = self.url.clone();
        base.set_path("/");
        base.set_query(None);
        base.set_fragment(None);
        return base;
    }

    pub fn problem_id(&self) -> Option<String> {
        let segments = self.url.path_segments()?.collect::<Vec<&str>>();
        if segments.len() >= 2 && segments[0] == "problem" && !segments[1].is_empty() {
            return Some(segments[1].to_string());
        }

        return None;
    }

    pub fn session_id(&self) -> Option<String> {
        return self
            .url
            .query_pairs()
            .find(|(key, _)| return key == SESSION_QUERY_KEY)
            .map(|(_, value)| return value.to_string())
            .filter(|value| return !value.is_empty());
    }

    /// Rewrites the page address in place so it carries only the given
    /// session id as its query.
    pub fn replace_session(&mut self, session_id: &str) {
        self.url.set_query(None);
        self.url
            .query_pairs_mut()
            .append_pair(SESSION_QUERY_KEY, session_id);
    }
}

/// Builds `ws(s)://<host>/ws/problem/{problem_id}/{session_id}/` from the site
/// root, following the scheme of the site.
pub fn channel_url(base_url: &Url, problem_id: &str, session_id: &str) -> Result<Url> {
    let mut url = base_url.clone();
    let scheme = match base_url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => bail!(format!("Unsupported scheme for chat channel: {other}")),
    };

    if url.set_scheme(scheme).is_err() {
        bail!(format!("Unable to build channel URL from {base_url}"));
    }

    url.set_path(&format!(
        "/ws/problem/{}/{}/",
        urlencoding::encode(problem_id),
        urlencoding::encode(session_id)
    ));
    url.set_query(None);
    url.set_fragment(None);

    return Ok(url);
}
