/*
 * Responsibility
 * - GET /me (認証必須)
 * - middleware が検証した AuthCtx をそのまま返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::services::auth::Claims;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub claims: Claims,
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        id: ctx.id,
        claims: ctx.claims,
    })
}
