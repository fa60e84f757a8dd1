//! Typed ids for every persisted entity.

pub use super::id::Id;

/// Marker for rows in `companies`.
pub struct Company;

/// Marker for rows in `voc_reports`.
pub struct VocReport;

/// Marker for rows in `reviews`.
pub struct Review;

/// Marker for rows in `user_accounts`.
pub struct UserAccount;

/// Marker for rows in `user_sessions`.
pub struct UserSession;

pub type CompanyId = Id<Company>;
pub type ReportId = Id<VocReport>;
pub type ReviewId = Id<Review>;
pub type UserAccountId = Id<UserAccount>;
pub type UserSessionId = Id<UserSession>;
