//! Core of the follower browser: the remote follower source, the paginated
//! follower list state and the controller that ties them to favorites storage.

pub mod controller;
pub mod events;
pub mod follower_list;
pub mod github;

pub use controller::{Completion, FollowerListController};
pub use events::{FavoriteOutcome, ListCommand, ListEvent};
pub use follower_list::{FollowerList, PageOutcome, PageRequest, ScrollMetrics};
pub use github::{FollowerSource, GithubClient, GithubClientOptions};
