// Browser profiles presented by the HTTP session: the TLS ClientHello and
// HTTP/2 settings of a real Chrome build, plus the default headers that
// browser sends. LinkedIn serves its web API to the browser that owns the
// cookies, so the session has to look like it at both layers.

use reqwest::browser::ChromeVersion;
use reqwest::header::{self, HeaderMap, HeaderValue};

/// Browser a session pretends to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Impersonate {
    /// Chrome 131 on macOS, the browser the cookie exporter targets.
    #[default]
    Chrome131,
}

impl Impersonate {
    /// Major version advertised in `sec-ch-ua`.
    pub fn major_version(self) -> u16 {
        match self {
            Impersonate::Chrome131 => 131,
        }
    }

    /// TLS and HTTP/2 fingerprint the client builder is configured with.
    /// The ClientHello carries no browser version, so the handshake is the
    /// closest one the TLS backend ships rather than an exact match.
    pub fn tls_profile(self) -> ChromeVersion {
        match self {
            Impersonate::Chrome131 => ChromeVersion::V108,
        }
    }

    /// Default request headers for this browser.
    pub fn headers(self) -> HeaderMap {
        match self {
            Impersonate::Chrome131 => chrome_headers(self.major_version()),
        }
    }
}

// `accept-encoding` is left to the client so it matches the decoders compiled in.
fn chrome_headers(major: u16) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
             image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );

    if let Ok(val) = HeaderValue::from_str(&format!(
        "\"Google Chrome\";v=\"{major}\", \"Chromium\";v=\"{major}\", \"Not_A Brand\";v=\"24\""
    )) {
        headers.insert("sec-ch-ua", val);
    }
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"macOS\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );

    headers
}
