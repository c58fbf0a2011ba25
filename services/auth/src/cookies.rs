//! Refresh token cookie

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Cookie name for the refresh token
pub const REFRESH_COOKIE: &str = "refresh_token";
/// Only the token endpoints ever see the refresh token
pub const REFRESH_COOKIE_PATH: &str = "/tokens";

/// Build an HTTP-only cookie carrying the refresh token
pub fn refresh_cookie(token: &str, max_age: chrono::Duration) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(REFRESH_COOKIE_PATH)
        .max_age(time::Duration::seconds(max_age.num_seconds()))
        .build()
}
