//! access token (HS256) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <token>` 以外は検証せずに拒否する
//! - 検証失敗のカテゴリはログにだけ残し、レスポンスは常に同一の 401
//! - `protect` で包んだ router の route だけが対象（それ以外の route では動かない）

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{TokenCodec, TokenError};
use crate::state::AppState;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was not authorized. Logged, never returned to the client.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("missing or non-bearer authorization header")]
    MissingCredential,
    #[error(transparent)]
    InvalidToken(#[from] TokenError),
}

impl AuthRejection {
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidToken(TokenError::Expired) => "expired",
            Self::InvalidToken(TokenError::Signature) => "bad_signature",
            Self::InvalidToken(_) => "malformed",
        }
    }
}

impl From<AuthRejection> for AppError {
    fn from(_: AuthRejection) -> Self {
        AppError::Unauthorized
    }
}

/// Framework-independent part of the check: headers in, identity out.
pub fn authenticate(codec: &TokenCodec, headers: &HeaderMap) -> Result<AuthCtx, AuthRejection> {
    let token = bearer_token(headers).ok_or(AuthRejection::MissingCredential)?;
    let claims = codec.verify(token)?;

    Ok(AuthCtx::new(claims))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// `router` の全 route に認証を掛ける。
///
/// 例：
/// ```ignore
/// let public = Router::new().route("/health", get(health));
/// let private = Router::new().route("/me", get(me));
/// let v1 = public.merge(middleware::auth::protect(private, state.clone()));
/// ```
pub fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: match しなかった request (404) には掛けない
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = match authenticate(&state.codec, req.headers()) {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::warn!(
                reason = err.category(),
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "access token verification failed"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(subject = %auth_ctx.id, "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeDelta;
    use serde_json::Map;

    use crate::services::auth::{SigningSecret, id_claims};

    fn codec() -> TokenCodec {
        TokenCodec::new(&SigningSecret::new("testtesttesttesttesttesttesttest").unwrap())
    }

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn missing_header_is_rejected_without_verification() {
        let err = authenticate(&codec(), &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AuthRejection::MissingCredential));
    }

    #[test]
    fn non_bearer_schemes_are_missing_credentials() {
        let codec = codec();
        let token = codec.issue(Map::new(), "user123").unwrap();

        for value in [
            format!("bearer {token}"),
            format!("Basic {token}"),
            format!("Bearer{token}"),
            token.clone(),
        ] {
            let err = authenticate(&codec, &headers(&value)).unwrap_err();
            assert!(
                matches!(err, AuthRejection::MissingCredential),
                "{value} -> {err:?}"
            );
        }
    }

    #[test]
    fn valid_bearer_token_yields_identity() {
        let codec = codec();
        let token = codec.issue(id_claims("user123"), "user123").unwrap();

        let ctx = authenticate(&codec, &headers(&format!("Bearer {token}"))).unwrap();
        assert_eq!(ctx.id, "user123");
        assert_eq!(ctx.claims.sub, "user123");
    }

    #[test]
    fn invalid_token_categories_are_distinguished_internally() {
        let codec = codec();

        let err = authenticate(&codec, &headers("Bearer invalid.token.value")).unwrap_err();
        assert_eq!(err.category(), "malformed");

        let other = TokenCodec::new(&SigningSecret::new("ffffffffffffffffffffffffffffffff").unwrap());
        let foreign = other.issue(Map::new(), "user123").unwrap();
        let err = authenticate(&codec, &headers(&format!("Bearer {foreign}"))).unwrap_err();
        assert_eq!(err.category(), "bad_signature");

        let stale = codec
            .issue_at(
                Map::new(),
                "user123",
                chrono::Utc::now() - TimeDelta::days(2),
            )
            .unwrap();
        let err = authenticate(&codec, &headers(&format!("Bearer {stale}"))).unwrap_err();
        assert_eq!(err.category(), "expired");
    }

    #[test]
    fn every_rejection_maps_to_unauthorized() {
        let rejections = [
            AuthRejection::MissingCredential,
            AuthRejection::InvalidToken(TokenError::Malformed("structure")),
            AuthRejection::InvalidToken(TokenError::Signature),
            AuthRejection::InvalidToken(TokenError::Expired),
        ];
        for rejection in rejections {
            assert!(matches!(AppError::from(rejection), AppError::Unauthorized));
        }
    }
}
