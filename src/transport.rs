// HTTP transport: one blocking reqwest session carrying the browser profile
// and the session cookies, and the four request shapes the Voyager API uses.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::auth::SessionAuth;
use crate::error::{Error, Result};
use crate::impersonate::Impersonate;

/// Rest.li method override header.
pub const RESTLI_METHOD: &str = "x-restli-method";
pub const PARTIAL_UPDATE: &str = "PARTIAL_UPDATE";

/// Blocking session bound to an API base URL. Headers are fixed when the
/// session is built.
#[derive(Debug)]
pub struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    pub fn new(base_url: &str, auth: &SessionAuth, impersonate: Impersonate) -> Result<Self> {
        let mut headers = impersonate.headers();
        // Auth headers, including the user agent, take precedence
        headers.extend(auth.headers()?);

        // The browser profile sets its own defaults first; ours override them.
        // A redirect means the cookies were rejected; never follow it
        let client = Client::builder()
            .chrome_builder(impersonate.tls_profile())
            .default_headers(headers)
            .redirect(Policy::none())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Transport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `<base><endpoint>` and decode the JSON body.
    pub fn fetch(&self, endpoint: &str, query: Option<&[(&str, String)]>) -> Result<Value> {
        let mut req = self.client.get(self.url(endpoint));
        if let Some(query) = query {
            req = req.query(query);
        }
        let res = self.execute(req)?;
        Ok(serde_json::from_slice(&res.bytes()?)?)
    }

    /// POST a JSON body. `None` when the server answers without content.
    pub fn submit<B>(&self, endpoint: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let req = self.client.post(self.url(endpoint)).json(body);
        json_or_empty(self.execute(req)?)
    }

    /// Rest.li PARTIAL_UPDATE: a POST on the keyed resource with the method
    /// override header.
    pub fn partial_update<B>(&self, endpoint: &str, key: &str, patch: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let req = self
            .client
            .post(self.keyed_url(endpoint, key))
            .header(RESTLI_METHOD, PARTIAL_UPDATE)
            .json(patch);
        json_or_empty(self.execute(req)?)
    }

    /// DELETE the keyed resource.
    pub fn remove(&self, endpoint: &str, key: &str) -> Result<()> {
        let req = self.client.delete(self.keyed_url(endpoint, key));
        self.execute(req)?;
        Ok(())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn keyed_url(&self, endpoint: &str, key: &str) -> String {
        format!("{}/{}", self.url(endpoint), urlencoding::encode(key))
    }

    fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "sending request");

        let res = self.client.execute(request)?;
        let status = res.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "received response");

        if is_expired_session(status) {
            tracing::warn!(status = status.as_u16(), "session rejected by LinkedIn");
            return Err(Error::ExpiredSession {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }
}

/// 302 is the redirect to the login page; 401 and 403 reject the cookies.
pub fn is_expired_session(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::FOUND | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

fn json_or_empty(res: Response) -> Result<Option<Value>> {
    let body = res.bytes()?;
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&body)?))
}
