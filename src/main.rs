#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockwatch_lib::run().await
}
