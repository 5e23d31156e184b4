//! HTTP route handlers for the web service.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                   - Liveness check
//! GET   /health/ready             - Readiness check (database)
//!
//! # Users
//! POST  /users                    - Register (and sign in)
//! GET   /users/{id}               - Profile, favorites and reviews
//! PATCH /users/me                 - Edit own profile (requires user)
//! POST  /auth/logout              - Sign out
//!
//! # Recipes
//! GET   /recipes/random           - Random recipes, optionally filtered by ?tags=
//! GET   /recipes/search           - Free-text search (?search=)
//! POST  /recipes/by-ingredients   - Recipes using the given ingredients
//! POST  /recipes/favorite         - Toggle a favorite (requires user)
//! GET   /recipes/{id}             - Recipe detail, nutrition and reviews
//! POST  /recipes/{id}/reviews     - Leave a review (requires user)
//!
//! # Ingredients
//! GET   /ingredients/substitutes  - Substitutes (?ingredient=)
//! GET   /ingredients/search       - Search with simulated prices (?ingredient=)
//!
//! # Cart
//! POST  /cart/load                - Price a cart
//! POST  /cart/submit              - Submit an order (requires user)
//! GET   /cart/history             - Past orders, newest first (requires user)
//! ```

pub mod auth;
pub mod cart;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::register))
        .route("/me", patch(users::update_me))
        .route("/{id}", get(users::show))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/logout", post(auth::logout))
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/random", get(recipes::random))
        .route("/search", get(recipes::search))
        .route("/by-ingredients", post(recipes::by_ingredients))
        .route("/favorite", post(recipes::toggle_favorite))
        .route("/{id}", get(recipes::show))
        .route("/{id}/reviews", post(recipes::create_review))
}

/// Create the ingredient routes router.
pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/substitutes", get(ingredients::substitutes))
        .route("/search", get(ingredients::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/load", post(cart::load))
        .route("/submit", post(cart::submit))
        .route("/history", get(cart::history))
}

/// Create all routes for the web service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/users", user_routes())
        .nest("/auth", auth_routes())
        .nest("/recipes", recipe_routes())
        .nest("/ingredients", ingredient_routes())
        .nest("/cart", cart_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
    use url::Url;

    use sous_chef_core::{UserId, Username};

    use super::*;
    use crate::config::{SentryConfig, SousChefConfig, SpoonacularConfig};
    use crate::middleware::set_current_user;
    use crate::models::CurrentUser;

    /// State over a pool that never connects and a recipe API that isn't
    /// there. Only requests that stop before I/O can succeed.
    fn state() -> AppState {
        let config = SousChefConfig {
            database_url: SecretString::from("postgres://localhost/sous_chef_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            spoonacular: SpoonacularConfig {
                base_url: Url::parse("http://127.0.0.1:9").unwrap(),
                api_key: SecretString::from("9f2c4e81ab7d4c3e95a0d6b1f8e27c4a"),
                cache_ttl: Duration::from_secs(60),
            },
            sentry: SentryConfig::default(),
        };
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://127.0.0.1:1/sous_chef_test")
            .unwrap();

        AppState::new(config, pool)
    }

    fn app() -> Router {
        routes().with_state(state())
    }

    async fn sign_in(session: Session) -> StatusCode {
        let user = CurrentUser {
            id: UserId::new(7),
            username: Username::parse("ada").unwrap(),
        };
        set_current_user(&session, &user).await.unwrap();
        StatusCode::NO_CONTENT
    }

    /// Full router behind an in-memory session store, plus a route that
    /// signs the caller in.
    fn app_with_sessions() -> Router {
        routes()
            .route("/test/sign-in", post(sign_in))
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
            .with_state(state())
    }

    /// Sign in and return the session cookie to send back.
    async fn session_cookie(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(post_json("/test/sign-in", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        request
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_empty_cart_prices_to_zero() {
        let response = app()
            .oneshot(post_json("/cart/load", r#"{"cart": []}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["cart_total"], "0.00");
        assert_eq!(body["cart_items"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_cart_line_is_unprocessable() {
        let response = app()
            .oneshot(post_json(
                "/cart/load",
                r#"{"cart": [{"id": 1, "count": 2, "price": "1.50"}, {"id": 2, "count": 0, "price": "0.99"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_body(response).await;
        assert_eq!(
            body["error"],
            "invalid quantity 0 for ingredient 2: must be at least 1"
        );
    }

    #[tokio::test]
    async fn test_negative_price_is_unprocessable() {
        let response = app()
            .oneshot(post_json(
                "/cart/load",
                r#"{"cart": [{"id": 1, "count": 1, "price": -1}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_order_routes_require_user() {
        let response = app().oneshot(get_request("/cart/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(post_json("/cart/submit", r#"{"order": []}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Please register or sign in first");
    }

    #[tokio::test]
    async fn test_signed_in_submit_validates_before_database() {
        let app = app_with_sessions();
        let cookie = session_cookie(&app).await;

        let response = app
            .clone()
            .oneshot(with_cookie(
                post_json("/cart/submit", r#"{"order": []}"#),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Bad request: cannot submit an empty order");

        let response = app
            .oneshot(with_cookie(
                post_json("/cart/submit", r#"{"order": [{"id": 9003, "count": 0, "price": "1.00"}]}"#),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_signed_in_history_reaches_database() {
        let app = app_with_sessions();
        let cookie = session_cookie(&app).await;

        let response = app
            .oneshot(with_cookie(get_request("/cart/history"), &cookie))
            .await
            .unwrap();

        // Past the session check; the unreachable database is a server error.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_favorite_and_review_require_user() {
        let response = app()
            .oneshot(post_json("/recipes/favorite", r#"{"recipe_id": 716429}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(post_json("/recipes/716429/reviews", r#"{"rating": 5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_diet_filter_is_bad_request() {
        let response = app()
            .oneshot(get_request("/recipes/random?tags=vegan,carnivore"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "Bad request: unknown diet filter 'carnivore'");
    }

    #[tokio::test]
    async fn test_blank_queries_are_bad_requests() {
        for uri in [
            "/recipes/search?search=%20",
            "/ingredients/substitutes?ingredient=",
            "/ingredients/search",
        ] {
            let response = app().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }

        let response = app()
            .oneshot(post_json("/recipes/by-ingredients", r#"{"ingredients": ["  "]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
