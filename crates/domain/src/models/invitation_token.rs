//! Invitation token listing DTOs and derived status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived lifecycle state of an invitation token.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    Active,
    Expired,
    Revoked,
    Exhausted,
}

impl TokenStatus {
    /// Derives the status from the token's stored state.
    ///
    /// Revocation wins over expiry, expiry over exhaustion, mirroring the
    /// order in which redemption checks them.
    pub fn derive(
        revoked: bool,
        expires_at: DateTime<Utc>,
        used_count: i32,
        max_uses: i32,
        now: DateTime<Utc>,
    ) -> Self {
        if revoked {
            TokenStatus::Revoked
        } else if expires_at <= now {
            TokenStatus::Expired
        } else if used_count >= max_uses {
            TokenStatus::Exhausted
        } else {
            TokenStatus::Active
        }
    }
}

/// A token as returned by the admin listing. Never carries the hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationTokenResponse {
    pub id: Uuid,
    pub role_to_grant: String,
    pub expires_at: DateTime<Utc>,
    pub max_uses: i32,
    pub used_count: i32,
    pub revoked: bool,
    pub status: TokenStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for listing a project's invitation tokens.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListTokensQuery {
    /// Filter: "active", "expired", "revoked", "exhausted" or "all" (default).
    pub status: Option<String>,

    /// Page number (default: 1).
    pub page: Option<i64>,

    /// Items per page (default: 50, max: 100).
    pub per_page: Option<i64>,
}

impl ListTokensQuery {
    /// Get the page number (1-indexed).
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page (clamped to 1-100).
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(50).clamp(1, 100)
    }

    /// Get the offset for pagination.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }

    /// Status filter to apply, `None` meaning no filtering.
    pub fn status_filter(&self) -> Option<&str> {
        match self.status.as_deref() {
            None | Some("all") => None,
            other => other,
        }
    }
}

/// Pagination info for token listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl TokenPagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = (total + per_page - 1) / per_page;
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Response for listing invitation tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTokensResponse {
    pub tokens: Vec<InvitationTokenResponse>,
    pub pagination: TokenPagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_derive_status_active() {
        let now = Utc::now();
        let status = TokenStatus::derive(false, now + Duration::days(7), 0, 1, now);
        assert_eq!(status, TokenStatus::Active);
    }

    #[test]
    fn test_derive_status_expired() {
        let now = Utc::now();
        let status = TokenStatus::derive(false, now - Duration::seconds(1), 0, 1, now);
        assert_eq!(status, TokenStatus::Expired);
    }

    #[test]
    fn test_derive_status_revoked_wins_over_expired() {
        let now = Utc::now();
        let status = TokenStatus::derive(true, now - Duration::days(1), 0, 1, now);
        assert_eq!(status, TokenStatus::Revoked);
    }

    #[test]
    fn test_derive_status_exhausted() {
        let now = Utc::now();
        let status = TokenStatus::derive(false, now + Duration::days(7), 1, 1, now);
        assert_eq!(status, TokenStatus::Exhausted);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&TokenStatus::Exhausted).unwrap(),
            "\"exhausted\""
        );
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListTokensQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 50);
        assert_eq!(query.offset(), 0);
        assert!(query.status_filter().is_none());
    }

    #[test]
    fn test_list_query_clamping() {
        let query = ListTokensQuery {
            status: None,
            page: Some(-3),
            per_page: Some(500),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);
    }

    #[test]
    fn test_list_query_status_filter() {
        let query = ListTokensQuery {
            status: Some("all".to_string()),
            page: None,
            per_page: None,
        };
        assert!(query.status_filter().is_none());

        let query = ListTokensQuery {
            status: Some("revoked".to_string()),
            page: None,
            per_page: None,
        };
        assert_eq!(query.status_filter(), Some("revoked"));
    }

    #[test]
    fn test_pagination_new() {
        let pagination = TokenPagination::new(2, 25, 75);
        assert_eq!(pagination.total_pages, 3);

        let pagination = TokenPagination::new(1, 50, 0);
        assert_eq!(pagination.total_pages, 0);
    }
}
