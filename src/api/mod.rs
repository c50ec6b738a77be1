//! API handlers for Biblio REST endpoints

pub mod authors;
pub mod books;
pub mod copies;
pub mod genres;
pub mod health;
pub mod languages;
pub mod loans;
pub mod openapi;
pub mod summary;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, AppState};

/// Header set by the upstream identity provider naming the caller
pub const USER_HEADER: &str = "x-library-user";
/// Header carrying the caller's comma-separated permission names
pub const PERMISSIONS_HEADER: &str = "x-library-permissions";

/// Permission required to renew or return copies
pub const PERM_MARK_RETURNED: &str = "can_mark_returned";

/// Caller identity as forwarded by the upstream identity provider
pub struct Principal {
    pub borrower_id: i32,
    permissions: Vec<String>,
}

impl Principal {
    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.iter().any(|p| p == name)
    }

    pub fn require_permission(&self, name: &str) -> Result<(), AppError> {
        if self.has_permission(name) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing permission: {}",
                name
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_header = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing identity header".to_string()))?;

        let borrower_id = user_header
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::Authentication("Invalid identity header".to_string()))?;

        let permissions = parts
            .headers
            .get(PERMISSIONS_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|raw| {
                raw.split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Principal {
            borrower_id,
            permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(permissions: &[&str]) -> Principal {
        Principal {
            borrower_id: 1,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn permission_check_matches_exact_name() {
        let caller = principal(&["can_mark_returned"]);
        assert!(caller.has_permission(PERM_MARK_RETURNED));
        assert!(caller.require_permission(PERM_MARK_RETURNED).is_ok());
    }

    #[test]
    fn missing_permission_is_rejected() {
        let caller = principal(&["can_edit_catalog"]);
        assert!(!caller.has_permission(PERM_MARK_RETURNED));
        assert!(caller.require_permission(PERM_MARK_RETURNED).is_err());
    }
}
