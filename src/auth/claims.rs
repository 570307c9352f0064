use serde::{Deserialize, Serialize};

use crate::utils::constants::{JWT_ALGORITHM, JWT_TYPE};

/// JOSE header of a provider token.
///
/// Field order is part of the wire format: `{"alg","typ","kid"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
    pub kid: String,
}

impl JwtHeader {
    pub fn es256(key_id: &str) -> Self {
        Self {
            alg: JWT_ALGORITHM.to_owned(),
            typ: JWT_TYPE.to_owned(),
            kid: key_id.to_owned(),
        }
    }
}

/// Claims of a provider token.
///
/// `iat` travels as a JSON string, not a number. The push service expects
/// exactly `{"iss":"..","iat":"..","kid":".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub iat: String,
    pub kid: String,
}

impl JwtClaims {
    pub fn new(issuer: &str, issued_at_unix: i64, key_id: &str) -> Self {
        Self {
            iss: issuer.to_owned(),
            iat: issued_at_unix.to_string(),
            kid: key_id.to_owned(),
        }
    }

    pub fn issued_at_unix(&self) -> Option<i64> {
        self.iat.parse().ok()
    }
}
