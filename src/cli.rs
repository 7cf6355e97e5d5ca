use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands::ask::{self, AskOptions, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE};
use crate::commands::article::{self, ArticleOptions, DEFAULT_PREVIEW_CHARS};
use crate::commands::normalize::{self, NormalizeOptions};
use crate::commands::summarize::{self, SummarizeOptions};
use crate::commands::ConfigOverrides;

pub const EXIT_MISSING_LINK: i32 = 1;
const USAGE_EXAMPLE: &str = "Example: arxsum https://arxiv.org/pdf/1804.08875";

#[derive(Debug, Parser)]
#[command(
    name = "arxsum",
    version,
    about = "Summarize arXiv articles with the GigaChat API",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Article link: arXiv abs/pdf URL or any direct PDF URL
    pub link: Option<String>,

    /// Language the summary is translated into
    #[arg(long)]
    pub language: Option<String>,

    /// Maximum number of article characters sent to the model
    #[arg(long)]
    pub max_chars: Option<usize>,

    #[command(flatten)]
    pub tls: TlsArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Args)]
pub struct TlsArgs {
    /// Disable TLS certificate validation (insecure; prefer ARXSUM_CA_CERT)
    #[arg(long)]
    pub insecure: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one question to the model and print the reply
    Ask {
        text: String,
        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system: String,
        #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f64,
        #[command(flatten)]
        tls: TlsArgs,
    },
    /// Download an article and print the beginning of its text
    Article {
        link: String,
        #[arg(long, default_value_t = DEFAULT_PREVIEW_CHARS)]
        chars: usize,
        #[command(flatten)]
        tls: TlsArgs,
    },
    /// Print the canonical PDF link without any network access
    Normalize { link: String },
}

fn overrides(tls: &TlsArgs) -> ConfigOverrides {
    ConfigOverrides {
        insecure: tls.insecure,
        ..ConfigOverrides::default()
    }
}

/// Run the parsed command, print its output, and return the exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    let output = match cli.command {
        Some(Command::Ask {
            text,
            system,
            temperature,
            tls,
        }) => ask::run(&AskOptions {
            text,
            system_prompt: system,
            temperature,
            overrides: overrides(&tls),
        })?,
        Some(Command::Article { link, chars, tls }) => article::run(&ArticleOptions {
            link,
            chars,
            overrides: overrides(&tls),
        })?,
        Some(Command::Normalize { link }) => normalize::run(&NormalizeOptions { link }),
        None => {
            let Some(link) = cli.link else {
                println!("Error: pass a link to the article.");
                println!("{USAGE_EXAMPLE}");
                return Ok(EXIT_MISSING_LINK);
            };
            summarize::run(&SummarizeOptions {
                link,
                overrides: ConfigOverrides {
                    insecure: cli.tls.insecure,
                    language: cli.language,
                    max_chars: cli.max_chars,
                },
            })?
        }
    };

    println!("{output}");
    Ok(0)
}
