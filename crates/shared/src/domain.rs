use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of followers the remote API returns for a full page.
pub const PAGE_SIZE: usize = 100;

/// A GitHub account as it appears in a follower list.
///
/// Two followers are equal only when both the login and the avatar URL match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Follower {
    pub login: String,
    pub avatar_url: String,
}

impl Follower {
    pub fn new(login: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            avatar_url: avatar_url.into(),
        }
    }

    /// Case-insensitive substring match on the login.
    pub fn login_matches(&self, needle_lowercase: &str) -> bool {
        self.login.to_lowercase().contains(needle_lowercase)
    }
}

/// Full profile returned by `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub avatar_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub public_gists: u32,
    pub html_url: String,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub followers: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_follower(&self) -> Follower {
        Follower::new(self.login.clone(), self.avatar_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn followers_differing_only_by_avatar_are_distinct() {
        let a = Follower::new("octocat", "https://avatars.example/1");
        let b = Follower::new("octocat", "https://avatars.example/2");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn login_match_ignores_case() {
        let follower = Follower::new("OctoCat", "https://avatars.example/1");
        assert!(follower.login_matches("octo"));
        assert!(follower.login_matches("tocat"));
        assert!(!follower.login_matches("dog"));
    }

    #[test]
    fn decodes_github_user_payload() {
        let raw = r#"{
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "name": "The Octocat",
            "location": null,
            "bio": null,
            "public_repos": 8,
            "public_gists": 8,
            "html_url": "https://github.com/octocat",
            "following": 9,
            "followers": 4000,
            "created_at": "2011-01-25T18:44:36Z",
            "type": "User"
        }"#;
        let user: User = serde_json::from_str(raw).expect("user");
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
        assert_eq!(user.public_repos, 8);
        assert_eq!(
            user.to_follower(),
            Follower::new("octocat", "https://avatars.githubusercontent.com/u/583231")
        );
    }
}
