//! Compact JWS assembly for provider tokens.
//!
//! `base64url(header) . base64url(claims) . base64url(signature)`, unpadded,
//! prefixed with the authorization scheme so the result drops straight into
//! a request header.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;
use serde_json::Value;

use crate::auth::claims::{JwtClaims, JwtHeader};
use crate::auth::signer::Signer;
use crate::errors::{TokenError, TokenResult};
use crate::utils::constants::BEARER_PREFIX;

fn encode_segment<T: Serialize>(record: &T) -> TokenResult<String> {
    let json = serde_json::to_vec(record).map_err(|e| TokenError::Encoding(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// `encodedHeader.encodedClaims`
pub fn signing_input(header: &JwtHeader, claims: &JwtClaims) -> TokenResult<String> {
    Ok(format!("{}.{}", encode_segment(header)?, encode_segment(claims)?))
}

/// Sign header and claims and return the header-ready `bearer <jwt>` value.
pub fn sign_token(
    signer: &dyn Signer,
    header: &JwtHeader,
    claims: &JwtClaims,
) -> TokenResult<String> {
    let input = signing_input(header, claims)?;
    let signature = signer.sign(input.as_bytes())?;
    Ok(format!("{}{}.{}", BEARER_PREFIX, input, URL_SAFE_NO_PAD.encode(signature)))
}

/// A token taken apart again: decoded header and claims JSON plus the raw signature.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    pub header: Value,
    pub claims: Value,
    pub signing_input: String,
    pub signature: Vec<u8>,
}

impl DecodedToken {
    pub fn typed_header(&self) -> TokenResult<JwtHeader> {
        serde_json::from_value(self.header.clone()).map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn typed_claims(&self) -> TokenResult<JwtClaims> {
        serde_json::from_value(self.claims.clone()).map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

fn decode_json(segment: &str) -> TokenResult<Value> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Encoding(format!("bad base64url segment: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Encoding(format!("bad json segment: {e}")))
}

/// Split a `bearer <jwt>` value into its three segments and decode them.
/// The `bearer ` prefix is optional.
pub fn decode_segments(token: &str) -> TokenResult<DecodedToken> {
    let body = token.strip_prefix(BEARER_PREFIX).unwrap_or(token);
    let parts: Vec<&str> = body.split('.').collect();
    let [header, claims, signature] = parts.as_slice() else {
        return Err(TokenError::Encoding(format!(
            "expected 3 segments, got {}",
            parts.len()
        )));
    };

    Ok(DecodedToken {
        header: decode_json(header)?,
        claims: decode_json(claims)?,
        signing_input: format!("{header}.{claims}"),
        signature: URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| TokenError::Encoding(format!("bad signature segment: {e}")))?,
    })
}
