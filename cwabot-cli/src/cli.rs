use anyhow::Context;
use clap::{Parser, Subcommand};
use cwabot_core::{Config, CwaFetcher, Reply, ReplyPolicy, catalog};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cwabot", version, about = "CWA 36-hour forecast bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the CWA API key in the config file.
    Configure,

    /// Answer one inbound message the way the bot would.
    Reply {
        /// The message text, e.g. "天氣 台北".
        message: String,

        /// Print card replies as a single JSON object instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List the supported cities by region.
    Cities,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => {
                let api_key = inquire::Password::new("CWA API key:")
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                let mut cfg = Config::load()?;
                cfg.set_api_key(api_key);
                cfg.save()?;

                println!("Saved API key to {}", Config::config_file_path()?.display());
            }
            Command::Reply { message, json } => {
                let cfg = Config::load()?;
                let fetcher = CwaFetcher::new(cfg.resolve_api_key());
                let policy = ReplyPolicy::new(Box::new(fetcher));

                match policy.handle_message(&message).await {
                    Reply::Text(text) => println!("{text}"),
                    Reply::Card(card) => {
                        if json {
                            println!("{}", serde_json::to_string_pretty(&card)?);
                        } else {
                            println!("{}", card.alt_text);
                            println!("{}", serde_json::to_string_pretty(&card.contents)?);
                        }
                    }
                }
            }
            Command::Cities => {
                println!("{}", catalog::format_supported_list());
            }
        }

        Ok(())
    }
}
