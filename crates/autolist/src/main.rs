use anyhow::{anyhow, Context, Result};
use autolist::{Buffer, Config, EditorAction, ListContinuation, Session};
use log::LevelFilter;
use std::env;

const USAGE: &str = "Usage: autolist <document> <script.json>";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger with debug fallback for development
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("autolist", LevelFilter::Debug);
        logger.filter_module("listcore", LevelFilter::Debug);
    }
    logger.init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", USAGE);
        return Err(anyhow!("missing arguments"));
    }

    let config = Config::load().await?;
    let content = tokio::fs::read_to_string(&args[1])
        .await
        .with_context(|| format!("Failed to read document: {}", args[1]))?;
    let script = tokio::fs::read_to_string(&args[2])
        .await
        .with_context(|| format!("Failed to read script: {}", args[2]))?;
    let actions: Vec<EditorAction> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid action script: {}", args[2]))?;
    log::info!("Replaying {} action(s) on {}", actions.len(), args[1]);

    let mut session = Session::new(Buffer::new());
    session.load_extension(Box::new(ListContinuation::new(config)))?;
    session.set_content(&content)?;

    for (index, action) in actions.into_iter().enumerate() {
        if let Err(e) = session.run(action) {
            log::error!("Action {} failed: {}", index, e);
            session.shutdown()?;
            return Err(e);
        }
    }
    session.shutdown()?;
    if !session.buffer().is_modified() {
        log::info!("Document left unchanged");
    }

    print!("{}", session.buffer().get_content());
    Ok(())
}
