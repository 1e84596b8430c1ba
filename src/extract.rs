use axum::extract::{FromRequestParts, Path};
use axum::http::{StatusCode, request::Parts};

/// Numeric hero id taken from the `{id}` path segment
///
/// Anything other than `[0-9]+` is treated as an unmatched route and
/// rejected with 404 before a handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroId(pub String);

impl HeroId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_numeric(raw: &str) -> bool {
        !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
    }
}

impl<S> FromRequestParts<S> for HeroId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::NOT_FOUND)?;

        if HeroId::is_numeric(&raw) {
            Ok(HeroId(raw))
        } else {
            tracing::debug!("Rejecting non-numeric hero id: {}", raw);
            Err(StatusCode::NOT_FOUND)
        }
    }
}
