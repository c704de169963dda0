#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = smartedu_rust::run().await {
        eprintln!("smartedu-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
