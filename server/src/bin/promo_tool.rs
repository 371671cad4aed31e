use anyhow::{Result, anyhow, bail};
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use clap::{Parser, Subcommand};
use rand::RngCore;

use promo_shared::promo::{PromoClaims, PromoCodec, now_ms};
use promo_shared::types::{MIN_SECRET_LEN, SECRET_ENV_VAR};

#[derive(Parser)]
#[command(name = "promo-tool")]
#[command(about = "Operator utilities for promo tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a freshly generated signing secret
    Secret {
        /// Number of random bytes before encoding
        #[arg(long, default_value_t = 48)]
        bytes: usize,
    },

    /// Mint a token without going through the order checks
    Mint {
        #[arg(long)]
        product: String,

        #[arg(long, default_value_t = 10.0)]
        percent: f64,

        #[arg(long = "ttl-minutes", default_value_t = 15)]
        ttl_minutes: u64,

        #[arg(long)]
        order: Option<String>,

        #[arg(long, env = SECRET_ENV_VAR, hide_env_values = true)]
        secret: String,
    },

    /// Authenticate a token and print its claims
    Inspect {
        token: String,

        #[arg(long, env = SECRET_ENV_VAR, hide_env_values = true)]
        secret: String,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Secret { bytes } => println!("{}", generate_secret(bytes)?),
        Command::Mint {
            product,
            percent,
            ttl_minutes,
            order,
            secret,
        } => {
            let codec = codec_for(&secret)?;
            let now = now_ms();
            let ttl_ms = i64::try_from(ttl_minutes.saturating_mul(60_000))?;

            let mut claims = PromoClaims::new(product, percent, now.saturating_add(ttl_ms), now);
            if let Some(order) = order {
                claims = claims.with_order_id(order);
            }

            println!("{}", codec.mint(&claims)?);
        }
        Command::Inspect { token, secret } => {
            let codec = codec_for(&secret)?;
            let claims = codec
                .authenticate(&token)
                .map_err(|e| anyhow!("{}: {}", e.code(), e))?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
    }

    Ok(())
}

fn generate_secret(bytes: usize) -> Result<String> {
    if bytes < MIN_SECRET_LEN {
        bail!("Secrets need at least {} random bytes", MIN_SECRET_LEN);
    }

    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    Ok(BASE64_URL_SAFE_NO_PAD.encode(buf))
}

fn codec_for(secret: &str) -> Result<PromoCodec> {
    if secret.len() < MIN_SECRET_LEN {
        bail!(
            "Signing secret must be at least {} characters (set {} or pass --secret)",
            MIN_SECRET_LEN,
            SECRET_ENV_VAR
        );
    }
    Ok(PromoCodec::new(secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generated_secret_is_url_safe_and_long_enough() {
        let secret = generate_secret(48).unwrap();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(secret, generate_secret(48).unwrap());
    }

    #[test]
    fn tiny_secrets_are_refused() {
        assert!(generate_secret(8).is_err());
        assert!(codec_for("short").is_err());
    }

    #[test]
    fn minted_token_inspects_back() {
        let codec = codec_for("0123456789abcdef0123456789abcdef").unwrap();
        let claims = PromoClaims::new("P1", 10.0, now_ms() + 60_000, now_ms());
        let token = codec.mint(&claims).unwrap();
        assert_eq!(codec.authenticate(&token).unwrap(), claims);
    }
}
