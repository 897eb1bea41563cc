//! Follower list controller: drives [`FollowerList`] from presentation
//! commands and remote/storage completions.
//!
//! Network and storage work runs on spawned tasks; their results come back
//! over an internal channel and are applied by whoever owns the controller,
//! so list state is only ever touched from one task.

use std::sync::Arc;

use shared::{
    domain::Follower,
    error::{FavoritesError, NetworkError, SelectionError},
};
use storage::FavoritesStore;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    events::{FavoriteOutcome, ListCommand, ListEvent},
    follower_list::{FollowerList, PageOutcome, PageRequest, ScrollMetrics},
    github::FollowerSource,
};

const FETCH_FAILED_TITLE: &str = "Bad Stuff";
const GENERIC_FAILURE_TITLE: &str = "Something went wrong";

/// Result of a spawned fetch or store call, waiting to be applied.
#[derive(Debug)]
pub enum Completion {
    Page {
        request: PageRequest,
        result: Result<Vec<Follower>, NetworkError>,
    },
    UserInfoFailed(NetworkError),
    FavoriteStored {
        follower: Follower,
        result: Result<(), FavoritesError>,
    },
    FavoriteRemoved {
        follower: Follower,
        result: Result<(), FavoritesError>,
    },
    FavoritesListed(Result<Vec<Follower>, FavoritesError>),
}

pub struct FollowerListController {
    list: FollowerList,
    source: Arc<dyn FollowerSource>,
    favorites: Arc<dyn FavoritesStore>,
    events: mpsc::UnboundedSender<ListEvent>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl FollowerListController {
    pub fn new(
        username: impl Into<String>,
        source: Arc<dyn FollowerSource>,
        favorites: Arc<dyn FavoritesStore>,
        events: mpsc::UnboundedSender<ListEvent>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            list: FollowerList::new(username),
            source,
            favorites,
            events,
            completion_tx,
            completion_rx,
        }
    }

    pub fn list(&self) -> &FollowerList {
        &self.list
    }

    /// Issues the first page request for the initial target.
    pub fn start(&mut self) {
        self.load_next_page();
    }

    pub fn load_next_page(&mut self) {
        if !self.list.has_target() {
            warn!("no target user to load followers for");
            self.emit(ListEvent::alert(
                FETCH_FAILED_TITLE,
                NetworkError::InvalidUsername.to_string(),
            ));
            return;
        }
        if let Some(request) = self.list.begin_fetch() {
            self.dispatch_page(request);
        }
    }

    pub fn trigger_page_advance_if_needed(&mut self, metrics: ScrollMetrics) {
        if let Some(request) = self.list.advance_if_needed(metrics) {
            self.dispatch_page(request);
        }
    }

    pub fn set_search_term(&mut self, term: &str) {
        let followers = self.list.set_search_term(term).to_vec();
        debug!(
            term,
            matches = followers.len(),
            searching = self.list.is_searching(),
            "search term applied"
        );
        self.emit(ListEvent::ListUpdated {
            followers,
            has_more: self.list.has_more(),
        });
    }

    pub fn select_follower(&self, index: usize) -> Result<Follower, SelectionError> {
        self.list.select(index).cloned()
    }

    pub fn change_target_user(&mut self, username: impl Into<String>) {
        let username = username.into();
        info!(
            from = %self.list.username(),
            to = %username,
            "switching follower list target"
        );
        self.list.reset(username);
        self.load_next_page();
    }

    /// Looks up `username` and stores it as a favorite.
    pub fn favorite_user(&self, username: impl Into<String>) {
        let username = username.into();
        let source = Arc::clone(&self.source);
        let favorites = Arc::clone(&self.favorites);
        self.spawn_completion(async move {
            match source.user_info(&username).await {
                Ok(user) => {
                    let follower = user.to_follower();
                    let result = favorites.add(&follower).await;
                    Completion::FavoriteStored { follower, result }
                }
                Err(err) => Completion::UserInfoFailed(err),
            }
        });
    }

    pub fn remove_favorite(&self, follower: Follower) {
        let favorites = Arc::clone(&self.favorites);
        self.spawn_completion(async move {
            let result = favorites.remove(&follower).await;
            Completion::FavoriteRemoved { follower, result }
        });
    }

    pub fn list_favorites(&self) {
        let favorites = Arc::clone(&self.favorites);
        self.spawn_completion(async move { Completion::FavoritesListed(favorites.list().await) });
    }

    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completion_rx.recv().await
    }

    pub fn handle_command(&mut self, command: ListCommand) {
        match command {
            ListCommand::ScrollSettled(metrics) => self.trigger_page_advance_if_needed(metrics),
            ListCommand::SearchTermChanged(term) => self.set_search_term(&term),
            ListCommand::ItemSelected(index) => match self.select_follower(index) {
                Ok(follower) => self.emit(ListEvent::FollowerSelected(follower)),
                Err(err) => warn!("ignoring selection: {err}"),
            },
            ListCommand::ChangeTargetUser(username) => self.change_target_user(username),
            ListCommand::FavoriteUser(username) => self.favorite_user(username),
            ListCommand::RemoveFavorite(follower) => self.remove_favorite(follower),
            ListCommand::ListFavorites => self.list_favorites(),
        }
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Page { request, result } => self.apply_page(request, result),
            Completion::UserInfoFailed(err) => {
                warn!("user info lookup for favorite failed: {err}");
                self.emit(ListEvent::alert(GENERIC_FAILURE_TITLE, err.to_string()));
            }
            Completion::FavoriteStored { follower, result } => {
                let outcome = match result {
                    Ok(()) => {
                        info!(login = %follower.login, "favorite added");
                        FavoriteOutcome::Added(follower)
                    }
                    Err(FavoritesError::Duplicate) => FavoriteOutcome::AlreadyFavorite(follower),
                    Err(err) => {
                        warn!(login = %follower.login, "favorite could not be saved: {err}");
                        FavoriteOutcome::CouldNotSave(err.to_string())
                    }
                };
                self.emit(ListEvent::Favorite(outcome));
            }
            Completion::FavoriteRemoved { follower, result } => match result {
                Ok(()) => self.emit(ListEvent::FavoriteRemoved(follower)),
                Err(err) => self.emit(ListEvent::alert(GENERIC_FAILURE_TITLE, err.to_string())),
            },
            Completion::FavoritesListed(result) => match result {
                Ok(favorites) => self.emit(ListEvent::Favorites(favorites)),
                Err(err) => self.emit(ListEvent::alert(GENERIC_FAILURE_TITLE, err.to_string())),
            },
        }
    }

    /// Issues the initial fetch, then applies commands and completions until
    /// the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<ListCommand>) {
        self.start();
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(completion) = self.completion_rx.recv() => self.handle_completion(completion),
            }
        }
        debug!(username = %self.list.username(), "follower list controller stopped");
    }

    fn apply_page(&mut self, request: PageRequest, result: Result<Vec<Follower>, NetworkError>) {
        match self.list.complete_page(&request, result) {
            PageOutcome::Stale => {
                debug!(
                    username = %request.username,
                    page = request.page,
                    current = %self.list.username(),
                    "dropping followers page for previous target"
                );
            }
            PageOutcome::Updated(followers) => {
                info!(
                    username = %request.username,
                    page = request.page,
                    total = self.list.all_followers().len(),
                    has_more = self.list.has_more(),
                    "followers page applied"
                );
                self.emit(ListEvent::Loading(false));
                self.emit(ListEvent::ListUpdated {
                    followers,
                    has_more: self.list.has_more(),
                });
            }
            PageOutcome::Empty(message) => {
                info!(username = %request.username, "user has no followers");
                self.emit(ListEvent::Loading(false));
                self.emit(ListEvent::EmptyResult(message.to_string()));
            }
            PageOutcome::Failed(err) => {
                warn!(
                    username = %request.username,
                    page = request.page,
                    "followers page failed: {err}"
                );
                self.emit(ListEvent::Loading(false));
                self.emit(ListEvent::alert(FETCH_FAILED_TITLE, err.to_string()));
            }
        }
    }

    fn dispatch_page(&self, request: PageRequest) {
        debug!(username = %request.username, page = request.page, "requesting followers page");
        self.emit(ListEvent::Loading(true));
        let source = Arc::clone(&self.source);
        self.spawn_completion(async move {
            let result = source.followers(&request.username, request.page).await;
            Completion::Page { request, result }
        });
    }

    fn spawn_completion<F>(&self, work: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(work.await);
        });
    }

    fn emit(&self, event: ListEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
