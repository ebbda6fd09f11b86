use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use edge_gate::config::{self, ConfigError, EdgeConfig};
use edge_gate::http::middleware::BypassRule;
use edge_gate::pipeline::locale::preference_cookie;
use edge_gate::{EdgePipeline, EdgeRequest};

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Inspect edge gate decisions offline", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what the gate does with a request target, e.g. "/app/chat?x=1#y"
    Decide {
        target: String,
        /// Cookie as name=value; repeatable
        #[arg(long = "cookie", value_name = "NAME=VALUE")]
        cookies: Vec<String>,
    },
    /// Validate the configuration and exit
    Check,
    /// Print the Set-Cookie value the language switcher writes for a locale
    LocaleCookie { tag: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(cli.config.as_deref())?;

    match cli.command {
        Commands::Decide { target, cookies } => {
            let mut request = EdgeRequest::parse(&target);
            for cookie in &cookies {
                let (name, value) = cookie
                    .split_once('=')
                    .ok_or_else(|| format!("cookie {cookie:?} is not NAME=VALUE"))?;
                request = request.with_cookie(name, value);
            }

            if BypassRule::from_config(&config.bypass).bypasses(&request.path) {
                println!("{}", serde_json::to_string_pretty(&json!({ "action": "bypass" }))?);
                return Ok(());
            }
            let pipeline = EdgePipeline::from_config(&config)?;
            let result = pipeline.evaluate(&request);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Check => {
            EdgePipeline::from_config(&config)?;
            println!("configuration ok");
        }
        Commands::LocaleCookie { tag } => {
            let pipeline = EdgePipeline::from_config(&config)?;
            match preference_cookie(pipeline.locale_cookie(), &tag, pipeline.locales()) {
                Some(cookie) => println!("{cookie}"),
                None => {
                    let supported: Vec<&str> = pipeline.locales().iter().collect();
                    return Err(format!("unsupported locale {tag:?}; expected one of {supported:?}").into());
                }
            }
        }
    }

    Ok(())
}

fn load(path: Option<&std::path::Path>) -> Result<EdgeConfig, ConfigError> {
    match path {
        Some(path) => config::load_config(path),
        None => config::loader::load_defaults(),
    }
}
