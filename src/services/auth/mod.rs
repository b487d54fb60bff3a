pub mod factory;
pub mod token_codec;

pub use factory::build_token_codec;
pub use token_codec::{
    Claims, CodecConfigError, SigningSecret, TokenCodec, TokenError, id_claims,
};
