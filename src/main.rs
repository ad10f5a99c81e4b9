use serverium::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    // A config that cannot be read is fatal; everything after it is
    // reported through the session log instead.
    let cfg = AppConfig::load()?;

    serverium::host::run(&cfg, tokio::signal::ctrl_c()).await?;
    Ok(())
}
