/*
 * Responsibility
 * - framework に依存しない domain service 群
 * - auth: token の発行/検証 (HS256)
 */
pub mod auth;
