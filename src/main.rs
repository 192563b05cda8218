#[tokio::main]
async fn main() -> anyhow::Result<()> {
    recrypt_portal::portal::run_cli().await
}
