use axum::{
    extract::{FromRef, State},
    routing::post,
    Form, Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, MessageResponse, RegisterForm, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        store::{StoreError, User},
    },
    error::ApiError,
    state::AppState,
};

fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9._-]{1,64}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_valid_username(&form.username) {
        warn!("rejected registration with invalid username");
        return Err(ApiError::BadRequest("invalid username".into()));
    }
    if form.password.is_empty() {
        return Err(ApiError::BadRequest("password must not be empty".into()));
    }

    let hash = hash_password(&form.password)?;
    if let Err(StoreError::DuplicateUser) = state.users.insert(User {
        username: form.username.clone(),
        password_hash: hash,
    }) {
        warn!(username = %form.username, "duplicate registration");
        return Err(ApiError::DuplicateUser);
    }

    info!(username = %form.username, "user registered");
    Ok(Json(MessageResponse {
        message: "User created successfully".into(),
    }))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown usernames and wrong passwords fail identically so the endpoint
    // cannot be used to enumerate accounts.
    let Some(user) = state.users.get(&form.username) else {
        warn!(username = %form.username, "login with unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(username = %form.username, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&user.username)?;

    info!(username = %user.username, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_charset_is_enforced() {
        assert!(is_valid_username("gardener"));
        assert!(is_valid_username("fern.fan_42"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("space man"));
        assert!(!is_valid_username("path/../traversal"));
        assert!(!is_valid_username(&"x".repeat(65)));
    }

    #[test]
    fn token_response_shape() {
        let response = TokenResponse {
            access_token: "abc".into(),
            token_type: "bearer",
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
    }
}
