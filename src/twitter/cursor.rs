//! Count-bounded pagination over the v1.1 list endpoints.
//!
//! Timelines and search page backwards with `max_id`; the friend list hands
//! out opaque `next_cursor` values where `0` means the list is exhausted.

use std::future::Future;

use anyhow::Result;
use tracing::debug;

use super::types::{FriendsResponse, Tweet, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    MaxId(u64),
    Cursor(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub count: usize,
    pub token: Option<PageToken>,
}

impl PageRequest {
    /// Query parameters continuing from the previous page.
    pub fn token_param(&self) -> Option<(&'static str, String)> {
        match self.token? {
            PageToken::MaxId(id) => Some(("max_id", id.to_string())),
            PageToken::Cursor(cursor) => Some(("cursor", cursor.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageToken>,
}

impl Page<Tweet> {
    /// The next page holds everything strictly older than the oldest tweet seen.
    pub fn by_max_id(tweets: Vec<Tweet>) -> Self {
        let next = tweets
            .iter()
            .map(|t| t.id)
            .min()
            .and_then(|oldest| oldest.checked_sub(1))
            .map(PageToken::MaxId);

        Self {
            items: tweets,
            next,
        }
    }
}

impl From<FriendsResponse> for Page<User> {
    fn from(response: FriendsResponse) -> Self {
        let next = match response.next_cursor {
            0 => None,
            cursor => Some(PageToken::Cursor(cursor)),
        };

        Self {
            items: response.users,
            next,
        }
    }
}

/// Pull pages from `fetch` until `limit` items are held or the source runs dry.
pub async fn collect_items<T, F, Fut>(
    limit: usize,
    max_page_size: usize,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token = None;

    while items.len() < limit {
        let count = (limit - items.len()).min(max_page_size);
        let page = fetch(PageRequest { count, token }).await?;

        debug!(
            requested = count,
            received = page.items.len(),
            "Fetched page"
        );

        if page.items.is_empty() {
            break;
        }

        items.extend(page.items);

        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    items.truncate(limit);

    Ok(items)
}
