/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - codec: 起動時に一度だけ作る TokenCodec (以後 read-only)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::auth::TokenCodec;

#[derive(Clone, Debug)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}
