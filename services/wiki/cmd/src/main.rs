//! Wiki article CLI.
//!
//! Queries the wiki service for an AI-generated explanatory article about
//! one source symbol. The editor-side collaborators of the protocol
//! (symbol lookup, context gathering, credential storage) are replayed
//! here as flags, context files, and a YAML config.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wiki_client::{
    dedup_followup_lines, ArticleQuery, ClientConfig, Credentials, StreamEvent, SymbolContext,
    WikiClient, WorkspaceIdentity,
};
use wiki_proto::{ModelType, RequestType, SymbolType};

mod config;
mod logging;

use config::WikiConfig;
use logging::WikiLogFormatter;

/// Wiki article CLI
#[derive(Parser, Debug)]
#[command(
    name = "wiki",
    version,
    about = "Fetch an explanatory wiki article for a source symbol"
)]
struct Args {
    /// Symbol name, e.g. parse_frame
    #[arg(long)]
    symbol: String,

    /// Symbol URI, e.g. file:///src/frame.rs#L42
    #[arg(long, default_value = "")]
    uri: String,

    /// Source language identifier, e.g. rust
    #[arg(long, default_value = "")]
    language: String,

    /// Symbol type: abstract wire name or short name (function, struct, ...)
    #[arg(long, default_value = "")]
    symbol_type: String,

    /// Request a sidebar summary instead of a full article
    #[arg(long)]
    sidebar: bool,

    /// Model tier override: abstract wire name or short name (premium, ...)
    #[arg(long)]
    model: Option<String>,

    /// Context file: surrounding file excerpt
    #[arg(long)]
    context_file: Option<PathBuf>,

    /// Context file: usage sites
    #[arg(long)]
    context_usage: Option<PathBuf>,

    /// Context file: trace output
    #[arg(long)]
    context_trace: Option<PathBuf>,

    /// Context file: quick grep results
    #[arg(long)]
    context_quick_grep: Option<PathBuf>,

    /// Context file: full grep results
    #[arg(long)]
    context_full_grep: Option<PathBuf>,

    /// Stream article deltas to stdout as they arrive
    #[arg(long)]
    stream: bool,

    /// Endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Overall request timeout, e.g. 120s
    #[arg(long, default_value = "120s")]
    timeout: humantime::Duration,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Configuration file path
    #[arg(long, default_value = "wiki.yaml")]
    config: PathBuf,

    /// Data directory override for the persisted workspace id
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Accept both the abstract wire name and a bare short name.
fn parse_symbol_type(name: &str) -> SymbolType {
    if name.is_empty() {
        return SymbolType::Unspecified;
    }
    let direct = SymbolType::from_name(name);
    if direct != SymbolType::Unspecified {
        return direct;
    }
    let prefixed = format!(
        "DEEP_WIKI_SYMBOL_TYPE_{}",
        name.to_uppercase().replace('-', "_")
    );
    SymbolType::from_name(&prefixed)
}

/// Accept both the abstract wire name and a bare short name.
fn parse_model_type(name: &str) -> ModelType {
    if name.is_empty() {
        return ModelType::Unspecified;
    }
    let direct = ModelType::from_name(name);
    if direct != ModelType::Unspecified {
        return direct;
    }
    let prefixed = format!(
        "DEEP_WIKI_MODEL_TYPE_{}",
        name.to_uppercase().replace('-', "_")
    );
    ModelType::from_name(&prefixed)
}

fn read_section(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading context file {}", path.display())),
        None => Ok(String::new()),
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::new("warn")
        .add_directive(format!("wiki={}", args.log_level).parse()?)
        .add_directive(format!("sourcewiki={}", args.log_level).parse()?)
        .add_directive(format!("wiki_wire={}", args.log_level).parse()?)
        .add_directive(format!("wiki_proto={}", args.log_level).parse()?)
        .add_directive(format!("wiki_client={}", args.log_level).parse()?);

    // Logs go to stderr so stdout stays clean for article output
    let formatter = WikiLogFormatter::new("wiki".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .event_format(formatter)
        .init();

    let config = WikiConfig::load_from_file(&args.config)?;

    let endpoint = args.endpoint.unwrap_or_else(|| config.endpoint.clone());
    let data_dir = args
        .data_dir
        .unwrap_or_else(|| PathBuf::from(&config.data_dir));
    let identity = WorkspaceIdentity::load_or_create(&data_dir.join("workspace-id"))
        .context("loading workspace identity")?;

    let model = args.model.as_deref().unwrap_or(&config.model);
    let client_config = ClientConfig {
        endpoint,
        ide_name: config.ide_name.clone(),
        ide_version: config.ide_version.clone(),
        extension_name: "sourcewiki".to_string(),
        extension_version: env!("CARGO_PKG_VERSION").to_string(),
        locale: config.locale.clone(),
        model_type: parse_model_type(model),
        timeout: Some(args.timeout.into()),
    };
    let credentials = Credentials {
        api_key: config.api_key.clone(),
        auth_token: config.auth_token.clone(),
    };

    let client = WikiClient::new(client_config, credentials, identity)?;

    let query = ArticleQuery {
        symbol_name: args.symbol.clone(),
        symbol_uri: args.uri.clone(),
        language: args.language.clone(),
        symbol_type: parse_symbol_type(&args.symbol_type),
        request_type: if args.sidebar {
            RequestType::Sidebar
        } else {
            RequestType::Article
        },
        context: SymbolContext {
            file: read_section(args.context_file.as_ref())?,
            usage: read_section(args.context_usage.as_ref())?,
            trace: read_section(args.context_trace.as_ref())?,
            quick_grep: read_section(args.context_quick_grep.as_ref())?,
            full_grep: read_section(args.context_full_grep.as_ref())?,
        },
    };

    if args.stream {
        let mut followups = String::new();
        client
            .stream_article(&query, |event| match event {
                StreamEvent::Article(text) => {
                    print!("{text}");
                    let _ = std::io::stdout().flush();
                }
                StreamEvent::Followup(text) => followups.push_str(&text),
                StreamEvent::Done => {}
            })
            .await?;
        println!();

        // Streaming mode hands out raw events; presentation-level dedup
        // is the caller's job
        let followups = dedup_followup_lines(&followups);
        if !followups.is_empty() {
            println!("\nFollow-up questions:");
            for followup in &followups {
                println!("- {followup}");
            }
        }
    } else {
        let article = client.fetch_article(&query).await?;
        println!("{article}");
    }

    Ok(())
}
