use std::sync::Arc;

use anyhow::Context;

use confluence_agent::agent::{AgentConfig, ToolCallingExecutor};
use confluence_agent::broker::BrokerClient;
use confluence_agent::cli::{Console, Terminal};
use confluence_agent::core::{load_dotenv, AppConfig};
use confluence_agent::interrupt::InterruptResolver;
use confluence_agent::llm::OpenAiProvider;
use confluence_agent::logging;
use confluence_agent::session::{SessionEnd, SessionLoop};
use confluence_agent::tools::{ToolQuery, ToolRegistry};
use confluence_agent::turn::TurnLoop;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = load_dotenv()?;

    // Missing identity or model stops the process before anything else.
    let config = AppConfig::from_env()?;

    let log_guard = logging::init_logging(&config.log)?;
    tracing::info!("=== Confluence Agent Starting ===");
    tracing::info!("Logging to {:?}", log_guard.path);
    if let Some(path) = dotenv_path {
        tracing::info!("Loaded environment from {:?}", path);
    }

    let broker = Arc::new(BrokerClient::new(&config.broker)?);
    let tools = ToolRegistry::from_provider(broker.as_ref(), &ToolQuery::from_config(&config))
        .await
        .context("Failed to fetch tool definitions")?;

    let llm = Arc::new(OpenAiProvider::new(&config.llm)?);
    let agent_config = AgentConfig::from_app_config(&config, Arc::new(tools))?;
    let executor = Arc::new(ToolCallingExecutor::new(agent_config, llm, broker.clone()));

    let terminal: Arc<dyn Terminal> = Arc::new(Console::new());
    let resolver = InterruptResolver::new(broker, terminal.clone());
    let turns = TurnLoop::new(executor, resolver, terminal.clone());
    let session = SessionLoop::new(turns, terminal, config.session_id.clone());

    tracing::info!("Session {} ready", session.session().session_id);

    let end = session.run().await?;
    match end {
        SessionEnd::Exit => tracing::info!("=== Confluence Agent Shutting Down (exit) ==="),
        SessionEnd::EndOfInput => tracing::info!("=== Confluence Agent Shutting Down (end of input) ==="),
    }

    Ok(())
}
