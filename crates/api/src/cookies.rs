//! Session/refresh cookie construction.
//!
//! Two cookies carry state across requests: `session` (access token,
//! 15 min) and `refreshToken` (refresh token, 7 days). Both are httpOnly
//! and SameSite=Lax; Secure everywhere except local development.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "session";
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Clone, Copy)]
pub struct CookieConfig {
    pub secure: bool,
}

impl CookieConfig {
    pub fn session(&self, token: String) -> Cookie<'static> {
        self.build(SESSION_COOKIE, token, Duration::minutes(15))
    }

    pub fn refresh(&self, token: String) -> Cookie<'static> {
        self.build(REFRESH_COOKIE, token, Duration::days(7))
    }

    /// Expired replacements, for logout.
    pub fn removals(&self) -> (Cookie<'static>, Cookie<'static>) {
        (
            self.build(SESSION_COOKIE, String::new(), Duration::ZERO),
            self.build(REFRESH_COOKIE, String::new(), Duration::ZERO),
        )
    }

    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        let mut cookie = Cookie::new(name, value);
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_max_age(max_age);
        cookie
    }
}
