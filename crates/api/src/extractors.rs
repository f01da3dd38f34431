//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Client IP address, taken from `x-real-ip` first, then the first entry
/// of `x-forwarded-for`.
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(real_ip) = parts.headers.get("x-real-ip") {
            if let Ok(ip) = real_ip.to_str() {
                return Ok(ClientIp(Some(ip.trim().to_string())));
            }
        }

        if let Some(xff) = parts.headers.get("x-forwarded-for") {
            if let Ok(xff_str) = xff.to_str() {
                if let Some(ip) = xff_str.split(',').next() {
                    return Ok(ClientIp(Some(ip.trim().to_string())));
                }
            }
        }

        Ok(ClientIp(None))
    }
}
