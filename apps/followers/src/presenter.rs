//! Terminal presentation adapter for the follower list controller.
//!
//! The presenter lays followers out in a fixed three-column grid so it can
//! report scroll positions the way a scrolling collection view would, and
//! walks through the actions requested on the command line one response at a
//! time.

use std::collections::VecDeque;

use client_core::{FavoriteOutcome, ListCommand, ListEvent, ScrollMetrics};
use shared::domain::Follower;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub row_height: f64,
    pub viewport_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 3,
            row_height: 140.0,
            viewport_height: 800.0,
        }
    }
}

impl GridLayout {
    pub fn content_height(&self, items: usize) -> f64 {
        let columns = self.columns.max(1);
        items.div_ceil(columns) as f64 * self.row_height
    }

    /// Metrics for a drag that ended slightly past the last row.
    pub fn scrolled_to_end(&self, items: usize) -> ScrollMetrics {
        let content_height = self.content_height(items);
        let offset = (content_height - self.viewport_height).max(0.0) + 1.0;
        ScrollMetrics::new(offset, content_height, self.viewport_height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    Select(usize),
    BrowseSelected,
    Favorite,
    ListFavorites,
    Unfavorite(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    Page,
    SearchResult,
    Selection,
    FavoriteResult,
    FavoritesList,
    Removal,
}

pub struct Presenter {
    layout: GridLayout,
    username: String,
    pages_wanted: u32,
    pages_loaded: u32,
    actions: VecDeque<Action>,
    awaiting: Option<Awaiting>,
    active_len: usize,
    selected: Option<Follower>,
    favorites: Vec<Follower>,
}

impl Presenter {
    pub fn new(
        username: impl Into<String>,
        layout: GridLayout,
        pages_wanted: u32,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        Self {
            layout,
            username: username.into(),
            pages_wanted: pages_wanted.max(1),
            pages_loaded: 0,
            actions: actions.into_iter().collect(),
            awaiting: Some(Awaiting::Page),
            active_len: 0,
            selected: None,
            favorites: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_done(&self) -> bool {
        self.awaiting.is_none()
    }

    /// Reacts to one controller event, returning the next command to send.
    pub fn on_event(&mut self, event: &ListEvent) -> Option<ListCommand> {
        let awaiting = self.awaiting?;
        match (awaiting, event) {
            (_, ListEvent::Loading(_)) => None,
            (Awaiting::Page, ListEvent::ListUpdated { followers, has_more }) => {
                self.pages_loaded += 1;
                self.active_len = followers.len();
                if *has_more && self.pages_loaded < self.pages_wanted {
                    debug!(pages_loaded = self.pages_loaded, "scrolling for next page");
                    return Some(ListCommand::ScrollSettled(
                        self.layout.scrolled_to_end(followers.len()),
                    ));
                }
                self.next_action()
            }
            (Awaiting::Page, ListEvent::EmptyResult(_) | ListEvent::Alert { .. }) => {
                self.active_len = 0;
                self.next_action()
            }
            (Awaiting::SearchResult, ListEvent::ListUpdated { followers, .. }) => {
                self.active_len = followers.len();
                self.next_action()
            }
            (Awaiting::Selection, ListEvent::FollowerSelected(follower)) => {
                self.selected = Some(follower.clone());
                self.next_action()
            }
            (Awaiting::FavoriteResult, ListEvent::Favorite(_) | ListEvent::Alert { .. }) => {
                self.next_action()
            }
            (Awaiting::FavoritesList, ListEvent::Favorites(favorites)) => {
                self.favorites = favorites.clone();
                self.next_action()
            }
            (Awaiting::FavoritesList | Awaiting::Removal, ListEvent::Alert { .. })
            | (Awaiting::Removal, ListEvent::FavoriteRemoved(_)) => self.next_action(),
            _ => None,
        }
    }

    fn next_action(&mut self) -> Option<ListCommand> {
        while let Some(action) = self.actions.pop_front() {
            match action {
                Action::Search(term) => {
                    self.awaiting = Some(Awaiting::SearchResult);
                    return Some(ListCommand::SearchTermChanged(term));
                }
                Action::Select(index) if index < self.active_len => {
                    self.awaiting = Some(Awaiting::Selection);
                    return Some(ListCommand::ItemSelected(index));
                }
                Action::Select(index) => {
                    warn!(index, len = self.active_len, "selection is outside the list");
                }
                Action::BrowseSelected => match self.selected.take() {
                    Some(follower) => {
                        self.username = follower.login.clone();
                        self.pages_loaded = 0;
                        self.pages_wanted = 1;
                        self.awaiting = Some(Awaiting::Page);
                        return Some(ListCommand::ChangeTargetUser(follower.login));
                    }
                    None => warn!("nothing selected to browse"),
                },
                Action::Favorite => {
                    self.awaiting = Some(Awaiting::FavoriteResult);
                    return Some(ListCommand::FavoriteUser(self.username.clone()));
                }
                Action::ListFavorites => {
                    self.awaiting = Some(Awaiting::FavoritesList);
                    return Some(ListCommand::ListFavorites);
                }
                Action::Unfavorite(login) => {
                    match self.favorites.iter().find(|f| f.login.eq_ignore_ascii_case(&login)) {
                        Some(follower) => {
                            self.awaiting = Some(Awaiting::Removal);
                            return Some(ListCommand::RemoveFavorite(follower.clone()));
                        }
                        None => warn!(%login, "not in favorites"),
                    }
                }
            }
        }
        self.awaiting = None;
        None
    }
}

/// Human-readable rendering of a controller event, if it has one.
pub fn describe(event: &ListEvent, layout: &GridLayout) -> Option<String> {
    match event {
        ListEvent::Loading(_) => None,
        ListEvent::ListUpdated {
            followers,
            has_more,
        } => {
            let mut out = format!(
                "{} followers{}",
                followers.len(),
                if *has_more { " (more available)" } else { "" }
            );
            for row in followers.chunks(layout.columns.max(1)) {
                out.push('\n');
                let cells: Vec<String> = row.iter().map(|f| format!("{:<24}", f.login)).collect();
                out.push_str(cells.join("").trim_end());
            }
            Some(out)
        }
        ListEvent::EmptyResult(message) => Some(message.clone()),
        ListEvent::Alert { title, message } => Some(format!("[{title}] {message}")),
        ListEvent::FollowerSelected(follower) => Some(format!(
            "selected {} ({})",
            follower.login, follower.avatar_url
        )),
        ListEvent::Favorite(FavoriteOutcome::Added(follower)) => Some(format!(
            "Success! You have successfully favorited {} 🎉",
            follower.login
        )),
        ListEvent::Favorite(FavoriteOutcome::AlreadyFavorite(follower)) => {
            Some(format!("{} is already a favorite", follower.login))
        }
        ListEvent::Favorite(FavoriteOutcome::CouldNotSave(message)) => {
            Some(format!("Could not save favorite: {message}"))
        }
        ListEvent::FavoriteRemoved(follower) => {
            Some(format!("removed {} from favorites", follower.login))
        }
        ListEvent::Favorites(favorites) => {
            let mut out = format!("{} favorites", favorites.len());
            for follower in favorites {
                out.push_str(&format!("\n  {}", follower.login));
            }
            Some(out)
        }
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
