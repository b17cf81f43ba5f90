#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stargaze::run().await
}
