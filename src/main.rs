#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = examspark::run().await {
        eprintln!("examspark fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
