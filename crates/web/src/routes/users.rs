//! User registration and profiles.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use futures::future::try_join_all;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sous_chef_core::{Email, UserId, Username};

use crate::db::{FavoriteRepository, ReviewRepository, UserRepository};
use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::{OptionalUser, RequireUser, set_current_user};
use crate::models::CurrentUser;
use crate::models::recipe::{DEFAULT_RECIPE_IMAGE, RecipeSummary};
use crate::models::user::{DEFAULT_PROFILE_PIC, NewUser, Profile, ProfileChanges, ProfileReview, User};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// `POST /users` request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// `PATCH /users/me` request body. Blank fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_pic: Option<String>,
}

// =============================================================================
// Validation
// =============================================================================

/// Trim a field; `None` if nothing is left.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required(field: &str, value: String) -> Result<String> {
    non_blank(Some(value)).ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

fn parse_username(raw: &str) -> Result<Username> {
    Username::parse(raw.trim()).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw.trim()).map_err(|e| AppError::BadRequest(e.to_string()))
}

impl TryFrom<RegisterRequest> for NewUser {
    type Error = AppError;

    fn try_from(body: RegisterRequest) -> Result<Self> {
        Ok(Self {
            first_name: required("first_name", body.first_name)?,
            last_name: required("last_name", body.last_name)?,
            username: parse_username(&body.username)?,
            email: parse_email(&body.email)?,
            profile_pic: non_blank(body.profile_pic)
                .unwrap_or_else(|| DEFAULT_PROFILE_PIC.to_owned()),
        })
    }
}

impl TryFrom<ProfileUpdateRequest> for ProfileChanges {
    type Error = AppError;

    fn try_from(body: ProfileUpdateRequest) -> Result<Self> {
        Ok(Self {
            first_name: non_blank(body.first_name),
            last_name: non_blank(body.last_name),
            username: non_blank(body.username)
                .map(|u| parse_username(&u))
                .transpose()?,
            email: non_blank(body.email).map(|e| parse_email(&e)).transpose()?,
            profile_pic: non_blank(body.profile_pic),
        })
    }
}

async fn sign_in(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
    };
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, user.username.as_str());
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /users` - register and sign in.
#[instrument(skip(state, session, body), fields(username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let new_user = NewUser::try_from(body)?;
    let user = UserRepository::new(state.pool()).create(&new_user).await?;

    sign_in(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}` - profile with favorite recipes and reviews.
#[instrument(skip(state, viewer))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<UserId>,
) -> Result<Json<Profile>> {
    let pool = state.pool();
    let user = UserRepository::new(pool)
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    let favorites_repo = FavoriteRepository::new(pool);
    let favorite_ids = favorites_repo.recipe_ids(id).await?;
    let viewer_favorites = match &viewer {
        Some(v) if v.id == id => Some(favorite_ids.clone()),
        Some(v) => Some(favorites_repo.recipe_ids(v.id).await?),
        None => None,
    };

    let recipes = state.recipes();
    let favorites = try_join_all(
        favorite_ids
            .iter()
            .map(|&recipe_id| recipes.recipe_information(recipe_id)),
    )
    .await?
    .iter()
    .map(|info| RecipeSummary::from(info).with_favorites(viewer_favorites.as_deref()))
    .collect();

    let user_reviews = ReviewRepository::new(pool).for_user(id).await?;
    let reviewed = try_join_all(
        user_reviews
            .iter()
            .map(|review| recipes.recipe_information(review.recipe_id)),
    )
    .await?;
    let reviews = user_reviews
        .into_iter()
        .zip(reviewed)
        .map(|(review, info)| ProfileReview {
            recipe_id: review.recipe_id,
            title: info.title,
            image: info
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_RECIPE_IMAGE.to_owned()),
            rating: review.rating,
            comment: review.comment,
        })
        .collect();

    Ok(Json(Profile {
        user,
        favorites,
        reviews,
    }))
}

/// `PATCH /users/me` - edit the signed-in user's profile.
#[instrument(skip(state, session, current, body), fields(user_id = %current.id))]
pub async fn update_me(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<User>> {
    let changes = ProfileChanges::try_from(body)?;
    let users = UserRepository::new(state.pool());

    if changes.is_empty() {
        let user = users.get_by_id(current.id).await?.ok_or_else(|| {
            AppError::NotFound(format!("user {}", current.id))
        })?;
        return Ok(Json(user));
    }

    let user = users.update(current.id, &changes).await?;
    if user.username != current.username {
        sign_in(&session, &user).await?;
    }

    Ok(Json(user))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn register_body(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            profile_pic: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_register_request_trims_and_defaults() {
        let user = NewUser::try_from(register_body("ada", "ada@example.com")).unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.profile_pic, DEFAULT_PROFILE_PIC);
    }

    #[test]
    fn test_register_request_rejects_bad_fields() {
        assert!(matches!(
            NewUser::try_from(register_body("a-very-long-username-indeed", "ada@example.com")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            NewUser::try_from(register_body("ada", "nope")),
            Err(AppError::BadRequest(_))
        ));

        let mut body = register_body("ada", "ada@example.com");
        body.last_name = String::new();
        let err = NewUser::try_from(body).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: last_name is required");
    }

    #[test]
    fn test_profile_update_ignores_blank_fields() {
        let changes = ProfileChanges::try_from(ProfileUpdateRequest {
            first_name: Some(String::new()),
            profile_pic: Some("/me.png".to_string()),
            ..ProfileUpdateRequest::default()
        })
        .unwrap();

        assert!(changes.first_name.is_none());
        assert_eq!(changes.profile_pic.as_deref(), Some("/me.png"));
        assert!(ProfileChanges::try_from(ProfileUpdateRequest::default())
            .unwrap()
            .is_empty());
    }
}
