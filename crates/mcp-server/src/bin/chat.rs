//! Terminal chat client
//!
//! Runs the conversation loop against OpenAI. Tools are dispatched in-process
//! or, with `--server`, through a running gateway's `/mcp/execute`.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dog_advisor::{DOG_ASSISTANT_PROMPT, TheDogApiClient};
use mcp_core::{CompletionProvider, ConversationLoop, LoopConfig, ToolDispatch};
use mcp_runtime::{OpenAiProvider, RemoteDispatcher};
use mcp_server::Domain;
use sheet_advisor::{SHEET_ASSISTANT_PROMPT, SmartsheetClient};

#[derive(Parser)]
#[command(name = "mcp-chat")]
#[command(about = "Chat with the MCP gateway's tools from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Tool domain to chat with
    #[arg(short, long, value_enum, default_value_t = Domain::Dogs)]
    domain: Domain,

    /// Gateway base URL; tools run in-process when omitted
    #[arg(short, long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,mcp_chat=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let provider: Arc<dyn CompletionProvider> =
        Arc::new(OpenAiProvider::from_env().context("OPENAI_API_KEY must be set")?);

    let tools = build_dispatcher(&cli, provider.clone())?;
    let prompt = match cli.domain {
        Domain::Dogs => DOG_ASSISTANT_PROMPT,
        Domain::Sheets => SHEET_ASSISTANT_PROMPT,
    };
    let mut session = ConversationLoop::new(provider, tools, LoopConfig::new(prompt));

    println!("Chat with the {} MCP (type 'exit' to quit)", cli.domain);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match session.submit(input).await {
            Ok(outcome) => {
                if let Some(call) = &outcome.tool_call {
                    tracing::info!(tool = %call.name, arguments = %call.arguments, "Called tool");
                }
                if let Some(result) = outcome.tool_result.as_ref().filter(|r| !r.success) {
                    tracing::warn!(error = ?result.error, "Tool returned an error");
                }
                println!("Assistant: {}", outcome.reply);
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}

fn build_dispatcher(
    cli: &Cli,
    provider: Arc<dyn CompletionProvider>,
) -> anyhow::Result<Arc<dyn ToolDispatch>> {
    if let Some(url) = &cli.server {
        tracing::info!(%url, "Dispatching tools through the gateway");
        return Ok(Arc::new(RemoteDispatcher::new(url.as_str())?));
    }

    let dispatcher: Arc<dyn ToolDispatch> = match cli.domain {
        Domain::Dogs => Arc::new(dog_advisor::dispatcher(
            Arc::new(TheDogApiClient::from_env()?),
            provider,
        )?),
        Domain::Sheets => Arc::new(sheet_advisor::dispatcher(
            Arc::new(SmartsheetClient::from_env()?),
            provider,
        )?),
    };
    Ok(dispatcher)
}
