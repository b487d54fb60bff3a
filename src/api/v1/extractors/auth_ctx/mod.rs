/*!
 * 認証済み identity の受け渡し
 *
 * - types: AuthCtx (検証済み token の sub と claims)
 * - core: protect された route の handler が AuthCtx を受け取るための extractor
 *   (access middleware が extensions に入れていなければ 401)
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
