use std::path::PathBuf;
use termbus::{init_logging, App, Config};

fn load_config() -> anyhow::Result<Config> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Ok(Config::load_from_file(&path)?),
        None => match Config::default_path() {
            Ok(path) => Ok(Config::load_or_default(&path)?),
            Err(e) => {
                tracing::warn!("{}, using default settings", e);
                Ok(Config::default())
            }
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    let config = load_config()?;
    let app = App::new(&config)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    app.run(stdin, &mut stdout).await
}
