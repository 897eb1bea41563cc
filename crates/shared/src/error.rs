use thiserror::Error;

/// Failures talking to the remote follower API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("This username created an invalid request. Please try again.")]
    InvalidUsername,
    #[error("Unable to complete your request. Please check your internet connection.")]
    UnableToComplete,
    #[error("Invalid response from the server (status {0}). Please try again.")]
    InvalidResponse(u16),
    #[error("The data received from the server was invalid. Please try again.")]
    InvalidData,
}

/// Failures from the local favorites store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FavoritesError {
    #[error("You've already favorited this user. You must REALLY like them!")]
    Duplicate,
    #[error("This user is not in your favorites.")]
    NotFound,
    #[error("There was an error saving favorites: {0}")]
    Persistence(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection index {index} is out of range for a list of {len} followers")]
    IndexOutOfRange { index: usize, len: usize },
}
