//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Herald - OAuth 1.0a request signing with retry
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding config.yaml (default: ~/.herald)
    #[arg(short, long, global = true, env = "HERALD_CONFIG_DIR")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an OAuth Authorization header value for a request
    Sign(SignArgs),

    /// Publish a post through the API, retrying transient failures
    Post(PostArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// HTTP method
    #[arg(short, long, default_value = "POST")]
    pub method: String,

    /// Request URL
    #[arg(short, long)]
    pub url: String,

    /// Form body parameter to sign (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Sign the URL's query string instead of body parameters
    #[arg(long, conflicts_with = "params")]
    pub query: bool,
}

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Text of the post
    #[arg(short, long)]
    pub text: String,

    /// Endpoint URL (default: <base-url>/2/tweets)
    #[arg(short, long)]
    pub url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse a `key=value` pair; the value may itself contain `=`
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;

    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }

    Ok((key.to_string(), value.to_string()))
}
