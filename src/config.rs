use std::net::SocketAddr;

use clap::Parser;
use url::Url;

use crate::search::oauth::Credentials;
use crate::token::{TokenLifeLength, WrapperId};

pub const DEFAULT_SEARCH_URL: &str = "https://api.twitter.com/1.1/users/search.json";


/// Runtime configuration. Every option can also be given through the environment.
#[derive(Clone, Parser)]
#[command(name = "fuhsen-web", version, about = "FuhSen web front controller")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "FUHSEN_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Maximum level of emitted log events.
    #[arg(long, env = "FUHSEN_LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,

    #[arg(long, env = "TWITTER_CONSUMER_KEY", hide_env_values = true)]
    pub twitter_consumer_key: String,

    #[arg(long, env = "TWITTER_CONSUMER_SECRET", hide_env_values = true)]
    pub twitter_consumer_secret: String,

    #[arg(long, env = "TWITTER_ACCESS_TOKEN", hide_env_values = true)]
    pub twitter_access_token: String,

    #[arg(long, env = "TWITTER_ACCESS_TOKEN_SECRET", hide_env_values = true)]
    pub twitter_access_token_secret: String,

    /// Endpoint of the user search API.
    #[arg(long, env = "FUHSEN_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_url: Url,

    /// Value sent as the `q` parameter of the user search.
    #[arg(long, env = "FUHSEN_SEARCH_KEYWORD", default_value = "Collarana")]
    pub search_keyword: String,

    /// Value sent as the `count` parameter of the user search.
    #[arg(long, env = "FUHSEN_SEARCH_COUNT", default_value_t = 100)]
    pub search_count: u32,

    #[arg(long, env = "FUHSEN_SEARCH_TIMEOUT_SECS", default_value_t = 30)]
    pub search_timeout_secs: u64,

    /// Token lifetime of a wrapper, as `wrapper=life_length`. May be repeated.
    #[arg(
        long = "token-life-length",
        env = "FUHSEN_TOKEN_LIFE_LENGTHS",
        value_delimiter = ',',
        value_parser = parse_life_length
    )]
    pub token_life_lengths: Vec<(WrapperId, TokenLifeLength)>,

    /// Lifetime reported for wrappers without an explicit entry.
    #[arg(long, env = "FUHSEN_DEFAULT_TOKEN_LIFE_LENGTH")]
    pub default_token_life_length: Option<TokenLifeLength>,
}

impl Config {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            consumer_key: self.twitter_consumer_key.clone(),
            consumer_secret: self.twitter_consumer_secret.clone(),
            token: self.twitter_access_token.clone(),
            token_secret: self.twitter_access_token_secret.clone(),
        }
    }
}

fn parse_life_length(entry: &str) -> Result<(WrapperId, TokenLifeLength), String> {
    let (wrapper_id, life_length) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected `wrapper=life_length`, got `{entry}`"))?;

    let wrapper_id = wrapper_id.trim();
    let life_length = life_length.trim();
    if wrapper_id.is_empty() || life_length.is_empty() {
        return Err(format!("expected `wrapper=life_length`, got `{entry}`"));
    }

    Ok((wrapper_id.to_owned(), life_length.to_owned()))
}
