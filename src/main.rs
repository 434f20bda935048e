use anyhow::Result;
use clap::Parser;
use paperdeck::{cli, Args};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    cli::run(args).await
}
