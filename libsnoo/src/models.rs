//! Domain records decoded from service responses
//!
//! The service wraps every object as a "thing":
//!
//! ```json
//! {"kind": "t3", "data": {"id": "abc", "title": "...", ...}}
//! ```
//!
//! Records are plain snapshots. They hold no reference to the client; pass
//! them back to a `Client` method (`client.vote(&link, ...)`) for follow-up
//! calls.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Anything that can be addressed by its `<kind>_<id>` fullname
pub trait Fullname {
    fn fullname(&self) -> String;
}

impl Fullname for str {
    fn fullname(&self) -> String {
        self.to_string()
    }
}

impl Fullname for String {
    fn fullname(&self) -> String {
        self.clone()
    }
}

fn timestamp(created_utc: f64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(created_utc as i64, 0).single()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Thing {
    #[serde(rename = "t1")]
    Comment(Comment),
    #[serde(rename = "t2")]
    Account(Account),
    #[serde(rename = "t3")]
    Link(Link),
    #[serde(rename = "t5")]
    Subreddit(Subreddit),
    #[serde(rename = "more")]
    More(More),
    Listing(Listing),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub children: Vec<Thing>,
    /// Cursor for the next page
    #[serde(default)]
    pub after: Option<String>,
    /// Cursor for the previous page
    #[serde(default)]
    pub before: Option<String>,
}

impl Listing {
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.children.iter().filter_map(|thing| match thing {
            Thing::Link(link) => Some(link),
            _ => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.children.iter().filter_map(|thing| match thing {
            Thing::Comment(comment) => Some(comment),
            _ => None,
        })
    }

    pub fn subreddits(&self) -> impl Iterator<Item = &Subreddit> {
        self.children.iter().filter_map(|thing| match thing {
            Thing::Subreddit(subreddit) => Some(subreddit),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub link_karma: i64,
    #[serde(default)]
    pub comment_karma: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub has_mail: Option<bool>,
    #[serde(default)]
    pub is_mod: bool,
    /// Only present on the logged-in user's own record
    #[serde(default)]
    pub modhash: Option<String>,
}

impl Account {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }
}

impl Fullname for Account {
    fn fullname(&self) -> String {
        format!("t2_{}", self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subreddit {
    #[serde(default)]
    pub id: String,
    /// Fullname, e.g. `t5_2qh1i`
    #[serde(default)]
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub public_description: String,
    #[serde(default)]
    pub subscribers: Option<u64>,
    #[serde(default)]
    pub over18: Option<bool>,
    #[serde(default)]
    pub created_utc: f64,
}

impl Subreddit {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }
}

impl Fullname for Subreddit {
    fn fullname(&self) -> String {
        if self.name.is_empty() {
            format!("t5_{}", self.id)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    /// Fullname, e.g. `t3_abc123`
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub downs: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub over_18: bool,
    /// `Some(true)` upvoted, `Some(false)` downvoted, `None` no vote
    #[serde(default)]
    pub likes: Option<bool>,
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub created_utc: f64,
}

impl Link {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }
}

impl Fullname for Link {
    fn fullname(&self) -> String {
        if self.name.is_empty() {
            format!("t3_{}", self.id)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subreddit: String,
    /// Fullname of the link this comment belongs to
    #[serde(default)]
    pub link_id: String,
    /// Fullname of the parent link or comment
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub likes: Option<bool>,
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default, deserialize_with = "replies")]
    pub replies: Listing,
}

impl Comment {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.starts_with("t3_")
    }
}

impl Fullname for Comment {
    fn fullname(&self) -> String {
        if self.name.is_empty() {
            format!("t1_{}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Placeholder for comments not included in a tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct More {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// A link together with its comment tree
#[derive(Debug, Clone, PartialEq)]
pub struct CommentsPage {
    pub link: Link,
    pub comments: Listing,
}

/// What the service returns after a successful submit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

// `replies` is an empty string when a comment has none, a Listing thing
// otherwise.
fn replies<'de, D>(deserializer: D) -> Result<Listing, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(Listing::default());
    }

    let thing = serde_json::from_value::<Thing>(value)
        .map_err(<D::Error as serde::de::Error>::custom)?;
    match thing {
        Thing::Listing(listing) => Ok(listing),
        _ => Ok(Listing::default()),
    }
}
