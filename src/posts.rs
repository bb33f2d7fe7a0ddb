// Post operations on top of the client: list the member share feed and
// create, update or delete shares.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::LinkedInClient;
use crate::error::{Error, Result};

pub const FEED_ENDPOINT: &str = "/feed/updates";
pub const SHARES_ENDPOINT: &str = "/contentcreation/normShares";

const UPDATE_POINTER: &str = "/value/com.linkedin.voyager.feed.render.UpdateV2";
const COMMENTARY_POINTER: &str = "/commentary/text/text";
const ARTICLE_TITLE_POINTER: &str =
    "/content/com.linkedin.voyager.feed.render.ArticleComponent/title/text";
const LIKES_POINTER: &str = "/socialDetail/totalSocialActivityCounts/numLikes";
const COMMENTS_POINTER: &str = "/socialDetail/totalSocialActivityCounts/numComments";

/// Flattened view of one feed update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub urn: String,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: Option<i64>,
    pub num_likes: u64,
    pub num_comments: u64,
}

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    #[value(name = "PUBLIC")]
    Public,
    #[value(name = "CONNECTIONS_ONLY")]
    ConnectionsOnly,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::ConnectionsOnly => "CONNECTIONS_ONLY",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ListOptions {
    pub count: u32,
    pub start: u32,
    /// Author to list; the caller's own profile when `None`.
    pub profile_urn: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            count: 20,
            start: 0,
            profile_urn: None,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Commentary<'a> {
    text: &'a str,
    attributes_v2: Vec<Value>,
}

impl<'a> Commentary<'a> {
    fn plain(text: &'a str) -> Self {
        Commentary {
            text,
            attributes_v2: Vec::new(),
        }
    }
}

/// Body of `POST /contentcreation/normShares`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct NewShare<'a> {
    visible_to_connections_only: bool,
    external_audience_providers: Vec<Value>,
    commentary_v2: Commentary<'a>,
    origin: &'static str,
    allowed_commenters_scope: &'static str,
    post_state: &'static str,
    author_urn: &'a str,
}

impl<'a> NewShare<'a> {
    fn new(author_urn: &'a str, text: &'a str, visibility: Visibility) -> Self {
        NewShare {
            visible_to_connections_only: visibility == Visibility::ConnectionsOnly,
            external_audience_providers: Vec::new(),
            commentary_v2: Commentary::plain(text),
            origin: "FEED",
            allowed_commenters_scope: "ALL",
            post_state: "PUBLISHED",
            author_urn,
        }
    }
}

/// Rest.li patch replacing only the commentary.
#[derive(Serialize, Debug)]
struct SharePatch<'a> {
    patch: SetCommentary<'a>,
}

#[derive(Serialize, Debug)]
struct SetCommentary<'a> {
    #[serde(rename = "$set")]
    set: CommentaryField<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CommentaryField<'a> {
    commentary_v2: Commentary<'a>,
}

impl<'a> SharePatch<'a> {
    fn text(text: &'a str) -> Self {
        SharePatch {
            patch: SetCommentary {
                set: CommentaryField {
                    commentary_v2: Commentary::plain(text),
                },
            },
        }
    }
}

/// Last `:`-separated segment of a URN, or the whole string.
pub fn profile_id(urn: &str) -> &str {
    urn.rsplit_once(':').map_or(urn, |(_, id)| id)
}

/// One page of the author's share feed, in API order.
pub fn list_posts(client: &mut LinkedInClient, options: &ListOptions) -> Result<Vec<Post>> {
    let urn = match options.profile_urn.as_deref().filter(|urn| !urn.is_empty()) {
        Some(urn) => urn.to_string(),
        None => client.profile_urn()?,
    };

    let query = [
        ("profileId", profile_id(&urn).to_string()),
        ("q", "memberShareFeed".to_string()),
        ("moduleKey", "member-share".to_string()),
        ("count", options.count.to_string()),
        ("start", options.start.to_string()),
    ];
    let feed = client.transport().fetch(FEED_ENDPOINT, Some(&query[..]))?;
    let posts = parse_posts(&feed);
    tracing::info!(count = posts.len(), profile = %urn, "listed posts");
    Ok(posts)
}

/// Flatten the `elements` of a feed response. Missing fields take their
/// defaults instead of failing.
pub fn parse_posts(feed: &Value) -> Vec<Post> {
    feed.get("elements")
        .and_then(Value::as_array)
        .map(|elements| elements.iter().map(parse_post).collect())
        .unwrap_or_default()
}

fn parse_post(element: &Value) -> Post {
    let update = element.pointer(UPDATE_POINTER);
    let field = |pointer: &str| update.and_then(|u| u.pointer(pointer));
    let non_empty_str = |pointer: &str| {
        field(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let text = non_empty_str(COMMENTARY_POINTER)
        .or_else(|| non_empty_str(ARTICLE_TITLE_POINTER))
        .unwrap_or_default()
        .to_string();

    Post {
        urn: element
            .get("updateUrn")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        text,
        created_at: element.get("createdTime").and_then(Value::as_i64),
        num_likes: field(LIKES_POINTER).and_then(Value::as_u64).unwrap_or(0),
        num_comments: field(COMMENTS_POINTER).and_then(Value::as_u64).unwrap_or(0),
    }
}

/// Publish a new share as the caller. `None` when the API answers with no
/// content.
pub fn create_post(
    client: &mut LinkedInClient,
    text: &str,
    visibility: Visibility,
) -> Result<Option<Value>> {
    let author = client.profile_urn()?;
    let share = NewShare::new(&author, text, visibility);
    let response = client.transport().submit(SHARES_ENDPOINT, &share)?;
    tracing::info!(%visibility, "post published");
    Ok(response)
}

/// Replace the text of an existing share, leaving its other fields alone.
pub fn update_post(
    client: &mut LinkedInClient,
    share_urn: &str,
    text: &str,
) -> Result<Option<Value>> {
    let patch = SharePatch::text(text);
    let response = client
        .transport()
        .partial_update(SHARES_ENDPOINT, share_urn, &patch)?;
    tracing::info!(share = share_urn, "post updated");
    Ok(response)
}

pub fn delete_post(client: &mut LinkedInClient, share_urn: &str) -> Result<()> {
    client.transport().remove(SHARES_ENDPOINT, share_urn)?;
    tracing::info!(share = share_urn, "post deleted");
    Ok(())
}

/// Delete shares in order, stopping at the first failure. Returns how many
/// were deleted; a failure reports the count deleted before it.
pub fn delete_posts<S: AsRef<str>>(client: &mut LinkedInClient, urns: &[S]) -> Result<usize> {
    for (deleted, urn) in urns.iter().enumerate() {
        let urn = urn.as_ref();
        if let Err(source) = delete_post(client, urn) {
            return Err(Error::PartialDelete {
                deleted,
                urn: urn.to_string(),
                source: Box::new(source),
            });
        }
    }
    Ok(urns.len())
}
