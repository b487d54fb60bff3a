/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - token の検証ロジックは services/middleware 側の責務
 * - request ごとに生成され、request と一緒に破棄される (共有しない)
 */

use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `id` は検証済み token の `sub`
/// - `claims` は検証済みの claim 全体（追加 claim の参照用）
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCtx {
    pub id: String,
    pub claims: Claims,
}

impl AuthCtx {
    pub fn new(claims: Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            claims,
        }
    }
}
