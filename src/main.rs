use anyhow::Context;
use clap::{Parser, Subcommand};
use crawlbait::{
    EnvironmentStore, GenerateRequest, LlmClient, PromptStore, ServerManager, SiteGenerator,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crawlbait",
    version,
    about = "Generate throwaway merchant websites for crawler testing and serve them locally"
)]
struct Cli {
    /// Base directory that holds generated environments
    #[arg(long, global = true, default_value = "test_environments")]
    base_dir: PathBuf,

    /// Directory containing system prompt templates
    #[arg(long, global = true, default_value = "prompts")]
    prompts_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a merchant website and serve it locally
    Generate {
        /// Type of merchant (electronics, clothing, books, ...)
        #[arg(long, default_value = "electronics")]
        merchant_type: String,

        /// Website style (modern, classic, minimalist, ...)
        #[arg(long, default_value = "modern")]
        style: String,

        /// Anti-crawler methods to request, comma separated
        /// (rate_limiting, user_agent_detection, honeypot_links, ...)
        #[arg(long = "anti-crawler", value_delimiter = ',')]
        anti_crawler: Vec<String>,

        /// Additional free-form requirements
        #[arg(long)]
        requirements: Option<String>,

        /// Environment name (synthesized from the merchant type if omitted)
        #[arg(long)]
        env_name: Option<String>,

        /// Preferred port for the local server
        #[arg(long, default_value_t = crawlbait::DEFAULT_PORT)]
        port: u16,

        /// Print model output incrementally while generating
        #[arg(long)]
        stream: bool,
    },

    /// Serve an existing environment
    Serve {
        /// Environment name
        name: String,

        /// Preferred port for the local server
        #[arg(long, default_value_t = crawlbait::DEFAULT_PORT)]
        port: u16,
    },

    /// List environments and their server status
    List,

    /// Stop any server for an environment and delete it
    Cleanup {
        /// Environment name
        name: String,
    },

    /// Remove one environment, or all of them
    Remove {
        /// Environment name
        name: Option<String>,

        /// Remove every environment under the base directory
        #[arg(long)]
        all: bool,
    },
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crawlbait=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let store = EnvironmentStore::new(&cli.base_dir)?;
    let servers = ServerManager::new(&cli.base_dir);

    match cli.command {
        Command::Generate {
            merchant_type,
            style,
            anti_crawler,
            requirements,
            env_name,
            port,
            stream,
        } => {
            let client = LlmClient::from_env()
                .context("backend configuration failed (is OPENAI_API_KEY set?)")?;
            let generator = SiteGenerator::new(Box::new(client), PromptStore::new(&cli.prompts_dir));

            let mut user_prompt =
                format!("Create a {} merchant website with a {} style.", merchant_type, style);
            if !anti_crawler.is_empty() {
                user_prompt.push_str(&format!(
                    " Implement these anti-crawler methods: {}.",
                    anti_crawler.join(", ")
                ));
            }

            println!("Generating {} merchant website ({} style)...", merchant_type, style);

            let result = if stream {
                let bundle = generator
                    .generate_site_streaming(
                        &user_prompt,
                        requirements.as_deref(),
                        Some(merchant_type.as_str()),
                        &mut |fragment| {
                            print!("{}", fragment);
                            let _ = std::io::stdout().flush();
                        },
                    )
                    .await?;
                println!();
                generator
                    .deploy(bundle, env_name, Some(port), &store, &servers)
                    .await?
            } else {
                let request = GenerateRequest {
                    user_prompt,
                    additional_requirements: requirements,
                    merchant_type: Some(merchant_type),
                    env_name,
                    port: Some(port),
                };
                generator.generate_and_deploy(request, &store, &servers).await?
            };

            println!("✓ Website generated and deployed");
            println!("  Environment: {}", result.environment_name);
            println!("  Files:       {}", result.bundle.files.len());
            println!("  URL:         {}", result.server_url);

            wait_then_shutdown(&servers).await;
        }

        Command::Serve { name, port } => {
            let url = servers.start(&name, Some(port)).await?;
            println!("✓ Serving '{}' at {}", name, url);
            wait_then_shutdown(&servers).await;
        }

        Command::List => {
            let mut names = store.list()?;
            names.sort();
            if names.is_empty() {
                println!("No test environments found.");
            } else {
                println!("Available test environments:");
                for name in names {
                    let info = store.info(&name, &servers).await?;
                    let status = if info.server_running { "running" } else { "stopped" };
                    let url = info.server_url.as_deref().unwrap_or("-");
                    println!("  {} [{}] {} ({} files)", name, status, url, info.files.len());
                }
            }
        }

        Command::Cleanup { name } => {
            store.cleanup(&name, &servers).await?;
            println!("✓ Environment '{}' cleaned up", name);
        }

        Command::Remove { name, all } => {
            if all {
                let names = store.list()?;
                if names.is_empty() {
                    println!("No environments to remove.");
                } else {
                    for name in &names {
                        store.cleanup(name, &servers).await?;
                        println!("✓ Removed: {}", name);
                    }
                    println!("✓ All {} environments removed", names.len());
                }
            } else if let Some(name) = name {
                store.cleanup(&name, &servers).await?;
                println!("✓ Environment '{}' removed", name);
            } else {
                eprintln!("✗ Specify an environment name or pass --all");
                std::process::exit(2);
            }
        }
    }

    Ok(())
}

/// Block until Ctrl-C, then stop every server before returning, so no
/// listener outlives the process's intent to serve.
async fn wait_then_shutdown(servers: &ServerManager) {
    println!("Press Ctrl-C to stop serving.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("✗ Failed to listen for shutdown signal: {}", e);
    }
    println!();
    servers.stop_all().await;
    println!("All servers stopped.");
}
