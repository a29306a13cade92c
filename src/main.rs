use case_copilot::config::AssistantConfig;
use case_copilot::console::Console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AssistantConfig::from_env()?;
    let console = Console::from_config(&config)?;

    eprintln!("🔎 Case Copilot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Endpoint: {}", config.endpoint_url());
    match &config.cases_path {
        Some(path) => eprintln!(
            "   Cases: {} from {}",
            console.workbench().cases().len(),
            path.display()
        ),
        None => eprintln!(
            "   Cases: {} (bundled demo data)",
            console.workbench().cases().len()
        ),
    }
    eprintln!("   Type /help for commands, /open to show the assistant.\n");

    console.run().await?;

    Ok(())
}
