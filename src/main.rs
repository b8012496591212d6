use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    grok::run().await
}
