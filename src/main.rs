#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hackmate::bootstrapper::run().await
}
