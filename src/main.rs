#[tokio::main]
async fn main() -> anyhow::Result<()> {
    minproxy::run().await
}
