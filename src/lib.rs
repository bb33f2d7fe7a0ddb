// Library root
// -----------
// Client for LinkedIn's private web API, authenticated with cookies exported
// from a logged-in browser. The binary (`main.rs`) wraps the post operations
// in a small CLI.
//
// Module responsibilities:
// - `auth`: loads the cookie file and builds the session headers.
// - `impersonate`: browser TLS and header profile presented by the session.
// - `transport`: blocking HTTP session and the GET / POST / PARTIAL_UPDATE /
//   DELETE primitives, including expired-session detection.
// - `profile`: resolves the caller's own profile URN (memory, disk, `/me`).
// - `client`: owns the session and the resolver for one run.
// - `posts`: list, create, update and delete posts.
// - `cli` and `logging`: the command-line front end.
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod impersonate;
pub mod logging;
pub mod posts;
pub mod profile;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::LinkedInClient;
pub use config::Config;
pub use error::{Error, Result};
pub use posts::{Post, Visibility};
