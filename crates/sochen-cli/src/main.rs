use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::env;
use std::time::Duration;

use sochen_core::config::{existing_config_paths, Config};
use sochen_core::env::{self as provider_env, EnvSnapshot};
use sochen_core::error::ResolveError;
use sochen_core::output::{write_json, OutputFormat};
use sochen_core::providers::ChatModel;
use sochen_core::resolver::{resolve, ModelRequest, Overrides, ProviderKind};

#[derive(Parser)]
#[command(
    name = "sochen",
    version,
    about = "Fast, agent-friendly coding agent shell"
)]
struct Cli {
    #[arg(long, global = true)]
    format: Option<String>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[arg(long, global = true, default_value = "60")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

struct AppContext {
    config: Config,
    client: reqwest::Client,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a provider and construct the chat model handle
    Resolve(ResolveArgs),
    /// Show visible credentials, config files, and the provider that would be picked
    Status,
}

#[derive(Args, Default)]
struct ResolveArgs {
    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    provider: Option<String>,

    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResolveSummary {
    provider: &'static str,
    model: String,
    endpoint: String,
    api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusSummary {
    openai_key: bool,
    anthropic_key: bool,
    openai_base_url: bool,
    config_files: Vec<String>,
    provider: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let format = resolve_format(cli.format.as_deref())?;
    let config = Config::load_with_profile(cli.profile.as_deref())?;
    let client = build_client(cli.timeout_secs)?;
    let ctx = AppContext { config, client };

    match cli.command {
        Commands::Resolve(args) => handle_resolve(&ctx, args, format),
        Commands::Status => handle_status(&ctx, cli.profile.as_deref(), format),
    }
}

fn resolve_format(flag: Option<&str>) -> Result<OutputFormat> {
    if let Some(fmt) = flag {
        return fmt.parse();
    }
    if env::var("SOCHEN_AGENT").ok().as_deref() == Some("1") {
        return Ok(OutputFormat::Json);
    }
    Ok(OutputFormat::Text)
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

fn handle_resolve(ctx: &AppContext, args: ResolveArgs, format: OutputFormat) -> Result<()> {
    let overrides = merge_overrides(&ctx.config, args);
    let env = EnvSnapshot::capture();
    let request = match resolve(&overrides, &env) {
        Ok(request) => request,
        Err(err) => fail_resolution(&err),
    };

    if format == OutputFormat::Text {
        announce_model(&request);
    }

    let model = ChatModel::build(&request, ctx.client.clone());
    let summary = summarize(&request, &model);
    match format {
        OutputFormat::Json => write_json(&summary),
        OutputFormat::Text => {
            println!("provider\t{}", summary.provider);
            println!("model\t{}", summary.model);
            println!("endpoint\t{}", summary.endpoint);
            println!("api_key\t{}", summary.api_key);
            if let Some(temperature) = summary.temperature {
                println!("temperature\t{temperature}");
            }
            if let Some(max_tokens) = summary.max_tokens {
                println!("max_tokens\t{max_tokens}");
            }
            Ok(())
        }
    }
}

fn handle_status(ctx: &AppContext, profile: Option<&str>, format: OutputFormat) -> Result<()> {
    let env = EnvSnapshot::capture();
    let overrides = merge_overrides(&ctx.config, ResolveArgs::default());
    let (provider, error) = match resolve(&overrides, &env) {
        Ok(request) => (Some(request.provider().as_str()), None),
        Err(err) => (None, Some(err.to_string())),
    };
    let summary = StatusSummary {
        openai_key: env.contains(provider_env::OPENAI_API_KEY),
        anthropic_key: env.contains(provider_env::ANTHROPIC_API_KEY),
        openai_base_url: env.contains(provider_env::OPENAI_BASE_URL),
        config_files: existing_config_paths(profile)
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
        provider,
        error,
    };
    match format {
        OutputFormat::Json => write_json(&summary),
        OutputFormat::Text => {
            println!("openai_key\t{}", summary.openai_key);
            println!("anthropic_key\t{}", summary.anthropic_key);
            println!("openai_base_url\t{}", summary.openai_base_url);
            for file in &summary.config_files {
                println!("config\t{file}");
            }
            match (&summary.provider, &summary.error) {
                (Some(provider), _) => println!("provider\t{provider}"),
                (None, Some(error)) => println!("provider\tunresolved ({error})"),
                (None, None) => {}
            }
            Ok(())
        }
    }
}

fn merge_overrides(config: &Config, args: ResolveArgs) -> Overrides {
    Overrides {
        model: args.model.or_else(|| config.defaults.model.clone()),
        provider: args.provider.or_else(|| config.defaults.provider.clone()),
        base_url: args.base_url.or_else(|| config.defaults.base_url.clone()),
        api_key: args.api_key,
    }
}

fn summarize(request: &ModelRequest, model: &ChatModel) -> ResolveSummary {
    let (temperature, max_tokens, base_url) = match request {
        ModelRequest::OpenAiCompatible {
            temperature,
            base_url,
            ..
        } => (Some(*temperature), None, base_url.clone()),
        ModelRequest::Anthropic { max_tokens, .. } => (None, Some(*max_tokens), None),
    };
    ResolveSummary {
        provider: model.provider().as_str(),
        model: model.model().to_string(),
        endpoint: model.endpoint(),
        api_key: mask_key(model.api_key()),
        temperature,
        max_tokens,
        base_url,
    }
}

fn announce_model(request: &ModelRequest) {
    match request {
        ModelRequest::OpenAiCompatible {
            model,
            base_url: Some(url),
            ..
        } => eprintln!("Using OpenAI-compatible model: {model} (base_url={url})"),
        ModelRequest::OpenAiCompatible {
            model,
            base_url: None,
            ..
        } => eprintln!("Using OpenAI model: {model}"),
        ModelRequest::Anthropic { model_name, .. } => {
            eprintln!("Using Anthropic model: {model_name}");
        }
    }
}

/// Resolution failures are terminal: print what to set or pass, then exit.
fn fail_resolution(err: &ResolveError) -> ! {
    match err {
        ResolveError::UnsupportedProvider(raw) => {
            eprintln!("Error: unsupported provider override '{raw}'. Expected 'openai' or 'anthropic'.");
        }
        ResolveError::MissingCredential(ProviderKind::OpenAICompatible) => {
            eprintln!("Error: no OpenAI-compatible API key configured.");
            eprintln!();
            eprintln!("Provide a key via one of the following methods:");
            eprintln!("  - Set OPENAI_API_KEY in your environment");
            eprintln!("  - Pass --api-key <key> on the CLI (optionally with --base-url)");
            eprintln!();
            eprintln!("Tip: you can also run with --provider anthropic if you have that key configured.");
        }
        ResolveError::MissingCredential(ProviderKind::Anthropic) => {
            eprintln!("Error: Anthropic provider selected but no API key configured.");
            eprintln!("Set ANTHROPIC_API_KEY or provide --api-key when selecting --provider anthropic.");
        }
        ResolveError::NoCredentials => {
            eprintln!("Error: no API key configured.");
            eprintln!();
            eprintln!("Please set one of the following environment variables:");
            eprintln!("  - OPENAI_API_KEY     (for OpenAI or any OpenAI-compatible endpoint)");
            eprintln!("  - ANTHROPIC_API_KEY  (for Claude models)");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  export OPENAI_API_KEY=your_api_key_here");
            eprintln!("  sochen resolve --provider openai --model meta/llama-3 --base-url https://your-host/api/v1 --api-key your_api_key_here");
            eprintln!();
            eprintln!("Or add it to your .env file.");
        }
        ResolveError::UnknownProvider(raw) => {
            eprintln!("Error: unknown provider: {raw}");
        }
    }
    std::process::exit(1);
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
