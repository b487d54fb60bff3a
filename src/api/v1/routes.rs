/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証が必要な route は `protected` にだけ登録する (middleware::auth::protect で包む)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware::auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new().route("/me", get(me));

    public.merge(auth::protect(protected, state))
}
