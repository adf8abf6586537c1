use clap::Parser;
use firma_admin::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Backend URL and key may live in a .env next to the checkout.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = firma_admin::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
