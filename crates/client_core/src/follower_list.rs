//! Paginated, searchable follower list state.
//!
//! This is the synchronous half of the follower list controller: it owns the
//! accumulated followers, the search projection and the pagination cursor, and
//! decides when a page request may be issued. Every fetch is split into a
//! `begin` step that hands out a [`PageRequest`] ticket and a
//! [`FollowerList::complete_page`] step that applies the response. Tickets
//! carry the generation they were issued under so responses for a previous
//! target user are recognised and dropped.

use shared::{
    domain::{Follower, PAGE_SIZE},
    error::{NetworkError, SelectionError},
};

pub const EMPTY_FOLLOWERS_MESSAGE: &str = "This user doesn't have any followers. Go follow them 😀";

/// Scroll position reported when the list view settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f64,
    pub content_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(offset: f64, content_height: f64, viewport_height: f64) -> Self {
        Self {
            offset,
            content_height,
            viewport_height,
        }
    }

    pub fn reached_trailing_edge(&self) -> bool {
        self.offset > self.content_height - self.viewport_height
    }
}

/// Ticket for one outstanding page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub username: String,
    pub page: u32,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Response for a target user that is no longer displayed.
    Stale,
    Updated(Vec<Follower>),
    Empty(&'static str),
    Failed(NetworkError),
}

#[derive(Debug, Clone)]
pub struct FollowerList {
    username: String,
    generation: u64,
    all: Vec<Follower>,
    filtered: Vec<Follower>,
    needle: Option<String>,
    page: u32,
    has_more: bool,
    is_fetching: bool,
    // `page` has not been loaded yet, either because it was never requested
    // or because its last fetch failed.
    page_pending: bool,
}

impl FollowerList {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            generation: 0,
            all: Vec::new(),
            filtered: Vec::new(),
            needle: None,
            page: 1,
            has_more: true,
            is_fetching: false,
            page_pending: true,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn has_target(&self) -> bool {
        !self.username.trim().is_empty()
    }

    pub fn is_searching(&self) -> bool {
        self.needle.is_some()
    }

    pub fn all_followers(&self) -> &[Follower] {
        &self.all
    }

    pub fn filtered_followers(&self) -> &[Follower] {
        &self.filtered
    }

    /// Whichever list is currently displayed.
    pub fn active_followers(&self) -> &[Follower] {
        if self.is_searching() {
            &self.filtered
        } else {
            &self.all
        }
    }

    /// Starts a fetch of the current page, or returns `None` when the list is
    /// exhausted, a fetch is already outstanding, or no target is set.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if !self.has_target() || !self.has_more || self.is_fetching {
            return None;
        }
        self.is_fetching = true;
        Some(PageRequest {
            username: self.username.clone(),
            page: self.page,
            generation: self.generation,
        })
    }

    /// Advances to the next page and starts fetching it once the trailing
    /// edge of the content is visible. A page whose fetch failed is requested
    /// again instead of being skipped.
    pub fn advance_if_needed(&mut self, metrics: ScrollMetrics) -> Option<PageRequest> {
        if !metrics.reached_trailing_edge() || !self.has_more || self.is_fetching {
            return None;
        }
        if !self.has_target() {
            return None;
        }
        if !self.page_pending {
            self.page += 1;
            self.page_pending = true;
        }
        self.begin_fetch()
    }

    pub fn complete_page(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Follower>, NetworkError>,
    ) -> PageOutcome {
        if request.generation != self.generation {
            return PageOutcome::Stale;
        }
        self.is_fetching = false;

        let batch = match result {
            Ok(batch) => batch,
            Err(err) => return PageOutcome::Failed(err),
        };

        self.page_pending = false;
        if batch.len() < PAGE_SIZE {
            self.has_more = false;
        }
        self.all.extend(batch);
        if self.all.is_empty() {
            return PageOutcome::Empty(EMPTY_FOLLOWERS_MESSAGE);
        }
        self.refilter();
        PageOutcome::Updated(self.active_followers().to_vec())
    }

    /// Applies a new search term and returns the resulting active list.
    pub fn set_search_term(&mut self, term: &str) -> &[Follower] {
        if term.trim().is_empty() {
            self.needle = None;
            self.filtered.clear();
        } else {
            self.needle = Some(term.to_lowercase());
            self.refilter();
        }
        self.active_followers()
    }

    pub fn select(&self, index: usize) -> Result<&Follower, SelectionError> {
        let active = self.active_followers();
        active.get(index).ok_or(SelectionError::IndexOutOfRange {
            index,
            len: active.len(),
        })
    }

    /// Switches to a new target user and discards every piece of list and
    /// pagination state. The search term is kept.
    pub fn reset(&mut self, username: impl Into<String>) {
        self.username = username.into();
        self.generation = self.generation.wrapping_add(1);
        self.all.clear();
        self.filtered.clear();
        self.page = 1;
        self.has_more = true;
        self.is_fetching = false;
        self.page_pending = true;
    }

    fn refilter(&mut self) {
        let Some(needle) = &self.needle else {
            return;
        };
        self.filtered = self
            .all
            .iter()
            .filter(|follower| follower.login_matches(needle))
            .cloned()
            .collect();
    }
}

#[cfg(test)]
#[path = "tests/follower_list_tests.rs"]
mod tests;
