#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quran_vocab_backend::run().await
}
