//! Typed operations on top of [`Client::call`]
//!
//! Operations that change state or read private data check the login guard
//! before any request is built. Public reads go straight to the network.

use std::fmt;

use serde::Deserialize;

use crate::client::Client;
use crate::envelope::Payload;
use crate::error::{Result, SnooError};
use crate::models::{
    Account, CommentsPage, Fullname, Link, Listing, Submission, Subreddit, Thing,
};
use crate::operation::Operation;
use crate::query::{self, Params};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    /// Clears an earlier vote
    Neutral,
    Down,
}

impl VoteDirection {
    pub fn as_param(&self) -> &'static str {
        match self {
            VoteDirection::Up => "1",
            VoteDirection::Neutral => "0",
            VoteDirection::Down => "-1",
        }
    }
}

/// Sort order for link listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sort {
    #[default]
    Hot,
    New,
    Rising,
    Top,
    Controversial,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Rising => "rising",
            Sort::Top => "top",
            Sort::Controversial => "controversial",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sort {
    type Err = SnooError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(Sort::Hot),
            "new" => Ok(Sort::New),
            "rising" => Ok(Sort::Rising),
            "top" => Ok(Sort::Top),
            "controversial" => Ok(Sort::Controversial),
            _ => Err(SnooError::InvalidInput(format!(
                "Invalid sort: '{}'. Valid options: hot, new, rising, top, controversial",
                s
            ))),
        }
    }
}

/// Which subreddit directory to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubredditListing {
    Popular,
    New,
    Default,
    /// Subreddits the user is subscribed to
    Mine,
    /// Subreddits the user is an approved submitter in
    Contributor,
    /// Subreddits the user moderates
    Moderator,
}

impl SubredditListing {
    pub fn path_segment(&self) -> &'static str {
        match self {
            SubredditListing::Popular => "popular",
            SubredditListing::New => "new",
            SubredditListing::Default => "default",
            SubredditListing::Mine => "mine/subscriber",
            SubredditListing::Contributor => "mine/contributor",
            SubredditListing::Moderator => "mine/moderator",
        }
    }

    /// Listings about the current user need a session
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            SubredditListing::Mine | SubredditListing::Contributor | SubredditListing::Moderator
        )
    }
}

/// One-shot cursor parameters for listing endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: Option<u32>,
}

impl Page {
    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            after: Some(cursor.into()),
            ..Self::default()
        }
    }

    pub fn before(cursor: impl Into<String>) -> Self {
        Self {
            before: Some(cursor.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(after) = &self.after {
            params.insert("after".to_string(), after.clone());
        }
        if let Some(before) = &self.before {
            params.insert("before".to_string(), before.clone());
        }
        if let Some(limit) = self.limit {
            params.insert("limit".to_string(), limit.to_string());
        }
        params
    }
}

fn listing(payload: Payload) -> Result<Listing> {
    match payload.decode::<Thing>()? {
        Thing::Listing(listing) => Ok(listing),
        _ => Err(SnooError::MalformedResponse(
            "expected a Listing".to_string(),
        )),
    }
}

fn account(payload: Payload) -> Result<Account> {
    match payload.decode::<Thing>()? {
        Thing::Account(account) => Ok(account),
        _ => Err(SnooError::MalformedResponse(
            "expected an account".to_string(),
        )),
    }
}

impl Client {
    /// The logged-in user's own account
    pub async fn me(&self) -> Result<Account> {
        self.require_login()?;
        account(self.call(Operation::Me, &[], None).await?)
    }

    /// Public profile of any user
    pub async fn user(&self, name: &str) -> Result<Account> {
        account(self.call(Operation::User, &[name], None).await?)
    }

    /// Look things up by fullname
    pub async fn info(&self, fullnames: &[&str]) -> Result<Listing> {
        if fullnames.is_empty() {
            return Err(SnooError::InvalidInput(
                "info needs at least one fullname".to_string(),
            ));
        }
        let ids = fullnames.join(",");
        listing(self.call(Operation::Info, &[ids.as_str()], None).await?)
    }

    /// Search subreddit names and descriptions
    pub async fn find_subreddits(&self, query: &str) -> Result<Vec<Subreddit>> {
        let params = query::params([("q", query)]);
        let found = listing(self.call(Operation::Search, &[], Some(&params)).await?)?;
        Ok(found.subreddits().cloned().collect())
    }

    pub async fn subreddits(&self, kind: SubredditListing, page: &Page) -> Result<Listing> {
        if kind.is_privileged() {
            self.require_login()?;
        }
        let params = page.to_params();
        listing(
            self.call(Operation::Subreddits, &[kind.path_segment()], Some(&params))
                .await?,
        )
    }

    /// Links in one subreddit
    pub async fn fetch_links(&self, subreddit: &str, sort: Sort, page: &Page) -> Result<Listing> {
        let params = page.to_params();
        listing(
            self.call(Operation::Links, &[subreddit, sort.as_str()], Some(&params))
                .await?,
        )
    }

    pub async fn front_page(&self, sort: Sort, page: &Page) -> Result<Listing> {
        let params = page.to_params();
        listing(
            self.call(Operation::FrontPage, &[sort.as_str()], Some(&params))
                .await?,
        )
    }

    /// A link and its comment tree
    pub async fn fetch_comments(&self, link: &Link) -> Result<CommentsPage> {
        let pages: Vec<Thing> = self
            .call(Operation::Comments, &[link.id.as_str()], None)
            .await?
            .decode()?;

        let mut pages = pages.into_iter();
        let link = match pages.next() {
            Some(Thing::Listing(listing)) => {
                listing.children.into_iter().find_map(|thing| match thing {
                    Thing::Link(link) => Some(link),
                    _ => None,
                })
            }
            _ => None,
        }
        .ok_or_else(|| SnooError::MalformedResponse("comments page has no link".to_string()))?;
        let comments = match pages.next() {
            Some(Thing::Listing(listing)) => listing,
            _ => Listing::default(),
        };

        Ok(CommentsPage { link, comments })
    }

    /// Submit a link to `subreddit`
    pub async fn submit_link(&self, subreddit: &str, title: &str, url: &str) -> Result<Submission> {
        self.require_login()?;
        let params = query::params([("kind", "link"), ("sr", subreddit), ("title", title), ("url", url)]);
        self.submit(params).await
    }

    /// Submit a self (text) post to `subreddit`
    pub async fn submit_text(&self, subreddit: &str, title: &str, text: &str) -> Result<Submission> {
        self.require_login()?;
        let params = query::params([("kind", "self"), ("sr", subreddit), ("title", title), ("text", text)]);
        self.submit(params).await
    }

    async fn submit(&self, params: Params) -> Result<Submission> {
        let submission: Submission = self
            .call(Operation::Submit, &[], Some(&params))
            .await?
            .decode()?;
        tracing::info!("Submitted {}", submission.name);
        Ok(submission)
    }

    /// Reply to a link or comment; returns the things the service created
    pub async fn comment<T: Fullname + ?Sized>(&self, parent: &T, text: &str) -> Result<Vec<Thing>> {
        self.require_login()?;

        #[derive(Deserialize)]
        struct Created {
            #[serde(default)]
            things: Vec<Thing>,
        }

        let parent = parent.fullname();
        let params = query::params([("thing_id", parent.as_str()), ("text", text)]);
        let created: Created = self
            .call(Operation::Comment, &[], Some(&params))
            .await?
            .decode()?;
        Ok(created.things)
    }

    pub async fn vote<T: Fullname + ?Sized>(&self, thing: &T, direction: VoteDirection) -> Result<()> {
        self.require_login()?;
        let id = thing.fullname();
        let params = query::params([("id", id.as_str()), ("dir", direction.as_param())]);
        self.call(Operation::Vote, &[], Some(&params)).await?;
        Ok(())
    }

    pub async fn save<T: Fullname + ?Sized>(&self, thing: &T) -> Result<()> {
        self.toggle(Operation::Save, thing).await
    }

    pub async fn unsave<T: Fullname + ?Sized>(&self, thing: &T) -> Result<()> {
        self.toggle(Operation::Unsave, thing).await
    }

    pub async fn hide<T: Fullname + ?Sized>(&self, thing: &T) -> Result<()> {
        self.toggle(Operation::Hide, thing).await
    }

    pub async fn unhide<T: Fullname + ?Sized>(&self, thing: &T) -> Result<()> {
        self.toggle(Operation::Unhide, thing).await
    }

    async fn toggle<T: Fullname + ?Sized>(&self, operation: Operation, thing: &T) -> Result<()> {
        self.require_login()?;
        let id = thing.fullname();
        let params = query::params([("id", id.as_str())]);
        self.call(operation, &[], Some(&params)).await?;
        Ok(())
    }
}
