//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sous_chef_core::{Email, RecipeId, Rating, UserId, Username};

use super::recipe::RecipeSummary;

/// Profile picture used when a user doesn't provide one.
pub const DEFAULT_PROFILE_PIC: &str = "/static/images/def_pfp.jpeg";

/// A registered user (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Unique display handle.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Image URL or site-relative path.
    pub profile_pic: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
    pub email: Email,
    pub profile_pic: String,
}

/// Validated profile edit. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub profile_pic: Option<String>,
}

impl ProfileChanges {
    /// Returns `true` if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.profile_pic.is_none()
    }
}

/// A review as shown on the reviewer's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReview {
    pub recipe_id: RecipeId,
    pub title: String,
    pub image: String,
    pub rating: Rating,
    pub comment: Option<String>,
}

/// `GET /users/{id}` response body.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: User,
    pub favorites: Vec<RecipeSummary>,
    pub reviews: Vec<ProfileReview>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_changes_is_empty() {
        assert!(ProfileChanges::default().is_empty());

        let changes = ProfileChanges {
            profile_pic: Some("/me.png".to_string()),
            ..ProfileChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
