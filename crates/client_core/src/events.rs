//! Messages exchanged between the follower list controller and its
//! presentation adapter.

use shared::domain::Follower;

use crate::follower_list::ScrollMetrics;

/// Input from the presentation adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    ScrollSettled(ScrollMetrics),
    SearchTermChanged(String),
    ItemSelected(usize),
    ChangeTargetUser(String),
    FavoriteUser(String),
    RemoveFavorite(Follower),
    ListFavorites,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added(Follower),
    AlreadyFavorite(Follower),
    CouldNotSave(String),
}

/// Output towards the presentation adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Loading(bool),
    ListUpdated {
        followers: Vec<Follower>,
        has_more: bool,
    },
    EmptyResult(String),
    Alert {
        title: String,
        message: String,
    },
    FollowerSelected(Follower),
    Favorite(FavoriteOutcome),
    FavoriteRemoved(Follower),
    Favorites(Vec<Follower>),
}

impl ListEvent {
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Alert {
            title: title.into(),
            message: message.into(),
        }
    }
}
