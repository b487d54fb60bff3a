/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: 保護 route への access interceptor
 * - http: request id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
