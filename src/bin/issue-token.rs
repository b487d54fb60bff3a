use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::{Map, Value};

use jwt_guard::config::AuthConfig;
use jwt_guard::services::auth::{build_token_codec, id_claims};

/// Issue an HS256 bearer token with the configured JWT_SECRET.
///
/// Reads JWT_SECRET / JWT_TTL_SECONDS from the environment (or .env) and
/// prints one token to stdout, suitable for `Authorization: Bearer <token>`.
#[derive(Parser, Debug)]
#[command(name = "issue-token", version, about)]
struct Args {
    /// Subject (`sub`) of the token
    #[arg(long)]
    subject: String,

    /// Extra claim as key=value. Values are parsed as JSON, falling back to a string.
    #[arg(long = "claim", value_name = "KEY=VALUE")]
    claims: Vec<String>,

    /// Also add an `id` claim equal to the subject
    #[arg(long, default_value_t = false)]
    with_id: bool,
}

fn parse_claim(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("claim must be KEY=VALUE, got {raw:?}");
    };
    if key.is_empty() {
        bail!("claim key must not be empty");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = AuthConfig::from_env().context("failed to load auth configuration")?;
    let codec = build_token_codec(&config)?;

    let mut extra = if args.with_id {
        id_claims(&args.subject)
    } else {
        Map::new()
    };
    for raw in &args.claims {
        let (key, value) = parse_claim(raw)?;
        extra.insert(key, value);
    }

    let token = codec.issue(extra, &args.subject)?;
    println!("{token}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_values_keep_their_type() {
        assert_eq!(parse_claim("level=3").unwrap(), ("level".to_string(), json!(3)));
        assert_eq!(parse_claim("admin=true").unwrap(), ("admin".to_string(), json!(true)));
        assert_eq!(
            parse_claim(r#"tags=["a","b"]"#).unwrap(),
            ("tags".to_string(), json!(["a", "b"]))
        );
    }

    #[test]
    fn non_json_values_fall_back_to_strings() {
        assert_eq!(
            parse_claim("tenant=acme").unwrap(),
            ("tenant".to_string(), json!("acme"))
        );
        assert_eq!(parse_claim("note=").unwrap(), ("note".to_string(), json!("")));
    }

    #[test]
    fn only_the_first_equals_splits() {
        assert_eq!(
            parse_claim("expr=a=b").unwrap(),
            ("expr".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = parse_claim("tenant").unwrap_err();
        assert!(err.to_string().contains("KEY=VALUE"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = parse_claim("=acme").unwrap_err();
        assert!(err.to_string().contains("key must not be empty"));
    }
}
