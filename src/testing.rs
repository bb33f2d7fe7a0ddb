// Fixtures shared by unit tests.

use crate::auth::{Cookie, SessionAuth};
use crate::impersonate::Impersonate;
use crate::transport::Transport;

pub fn auth() -> SessionAuth {
    SessionAuth::from_cookies(vec![
        Cookie {
            name: "li_at".into(),
            value: "token".into(),
        },
        Cookie {
            name: "JSESSIONID".into(),
            value: "\"ajax:42\"".into(),
        },
    ])
    .expect("fixture cookies are complete")
}

pub fn transport(base_url: &str) -> Transport {
    Transport::new(base_url, &auth(), Impersonate::default()).expect("transport builds")
}
