use anyhow::Result;
use loam_benchmarks::grove::{HarnessConfig, Runner};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let runner = Runner::new(HarnessConfig::default());
    runner.run_all().await?;

    Ok(())
}
