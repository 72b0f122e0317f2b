//! Claims carried by a session token.

use serde::{Deserialize, Serialize};

/// Claims for a session token issued at login.
///
/// `sub` is the user's id in hyphenated UUID form. `iat` and `exp` are
/// seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}
