use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use serde::Serialize;

use crate::db;
use crate::error::AppError;
use crate::models::Role;
use crate::state::AppState;

/// The authenticated user behind a request. Built fresh per request from the
/// bearer token; nothing about the caller is kept between requests.
#[derive(Debug, Clone, Serialize)]
pub struct Caller {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    #[serde(skip)]
    pub access_token: String,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Students may only read their own records; admins may read anyone's.
    pub fn require_self_or_admin(&self, student_id: &str) -> Result<(), AppError> {
        if self.is_admin() || self.user_id == student_id {
            Ok(())
        } else {
            Err(AppError::Forbidden("You can only access your own records".to_string()))
        }
    }
}

/// A caller whose profile role is admin.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub Caller);

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let access_token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Please sign in to continue".to_string()))?;

        let user = state.auth.get_user(&access_token).await?;
        let profile = db::profiles::find_by_id(&state.db, &user.id)
            .await?
            .ok_or_else(|| AppError::Forbidden("No profile exists for this account".to_string()))?;

        Ok(Caller {
            role: profile.role(),
            user_id: profile.id,
            email: profile.email,
            access_token,
        })
    }
}

impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        if !caller.is_admin() {
            return Err(AppError::Forbidden(format!(
                "Admin privileges required. Your account role is \"{}\".",
                caller.role.as_str()
            )));
        }
        Ok(AdminCaller(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_bearer_tokens_case_insensitively() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc".to_string()));
        assert_eq!(bearer_token(&headers("bearer  xyz ")), Some("xyz".to_string()));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn students_only_reach_their_own_records() {
        let caller = Caller {
            user_id: "s1".to_string(),
            email: "s1@example.com".to_string(),
            role: Role::Student,
            access_token: String::new(),
        };
        assert!(caller.require_self_or_admin("s1").is_ok());
        assert!(caller.require_self_or_admin("s2").is_err());

        let admin = Caller { role: Role::Admin, ..caller };
        assert!(admin.require_self_or_admin("s2").is_ok());
    }
}
