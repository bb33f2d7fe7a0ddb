// Session authentication: LinkedIn's web API accepts the same cookies a
// logged-in browser sends, plus a CSRF token derived from `JSESSIONID`.

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use serde::Deserialize;

use crate::error::{Error, Result};

/// User agent sent with every request. Must agree with the browser profile in
/// `impersonate`.
pub const CHROME_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/131.0.0.0 Safari/537.36";

const LI_AT: &str = "li_at";
const JSESSIONID: &str = "JSESSIONID";

const CSRF_TOKEN: &str = "csrf-token";
const LI_LANG: &str = "x-li-lang";
const RESTLI_PROTOCOL_VERSION: &str = "x-restli-protocol-version";

/// One entry of the exported browser cookie file. Any other keys the
/// exporter writes (domain, path, expiry...) are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Cookies loaded from disk and the two values the API insists on.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    cookies: Vec<Cookie>,
    li_at: String,
    csrf_token: String,
}

impl SessionAuth {
    /// Read a JSON array of `{name, value}` objects from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::CookieFile {
            path: path.to_path_buf(),
            source,
        })?;
        let cookies: Vec<Cookie> =
            serde_json::from_str(&raw).map_err(|source| Error::CookieFormat {
                path: path.to_path_buf(),
                source,
            })?;
        let auth = Self::from_cookies(cookies)?;
        tracing::debug!(path = %path.display(), cookies = auth.cookies.len(), "loaded session cookies");
        Ok(auth)
    }

    pub fn from_cookies(cookies: Vec<Cookie>) -> Result<Self> {
        let li_at = last_value(&cookies, LI_AT)
            .ok_or(Error::MissingCredential { name: LI_AT })?
            .to_string();
        let jsessionid =
            last_value(&cookies, JSESSIONID).ok_or(Error::MissingCredential { name: JSESSIONID })?;
        let csrf_token = strip_quotes(jsessionid).to_string();

        Ok(SessionAuth {
            cookies,
            li_at,
            csrf_token,
        })
    }

    pub fn li_at(&self) -> &str {
        &self.li_at
    }

    /// `JSESSIONID` without its surrounding quotes.
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Every loaded cookie, in file order, as a single `Cookie` header.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Headers attached once to the HTTP session.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_TOKEN, header_value(CSRF_TOKEN, &self.csrf_token)?);
        headers.insert(LI_LANG, HeaderValue::from_static("en_US"));
        headers.insert(RESTLI_PROTOCOL_VERSION, HeaderValue::from_static("2.0.0"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CHROME_UA));
        headers.insert(COOKIE, header_value("cookie", &self.cookie_header())?);
        Ok(headers)
    }
}

fn last_value<'a>(cookies: &'a [Cookie], name: &str) -> Option<&'a str> {
    cookies
        .iter()
        .rev()
        .find(|c| c.name == name)
        .map(|c| c.value.as_str())
}

// One quote off each end, no more.
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|source| Error::InvalidHeader { name, source })
}
