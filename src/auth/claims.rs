use serde::{Deserialize, Serialize};

/// Self-contained token payload. The subject is the username; validity is
/// decided solely by signature and `exp` at the moment of use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
}
