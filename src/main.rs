use anyhow::Result;
use mailgraph::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
