/// Factory: build `TokenCodec` from the auth section of `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{CodecConfigError, TokenCodec};

pub fn build_token_codec(config: &AuthConfig) -> Result<Arc<TokenCodec>, CodecConfigError> {
    let codec = TokenCodec::new(&config.secret).with_ttl(config.token_ttl)?;

    tracing::info!(
        ttl_seconds = codec.ttl().num_seconds(),
        "token codec ready"
    );

    Ok(Arc::new(codec))
}
