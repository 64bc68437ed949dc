use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::Write;
use std::sync::Arc;

use img_pool::server::{self, AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    let state = Arc::new(AppState::new(&config));
    state.store.ensure_dir()?;

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Starting image server on port {}...", config.server.port);
    info!("📁 Upload directory: {}", state.store.dir().display());
    info!("📤 Upload URL: {}/upload", config.base_url());
    info!("🌐 Images URL: {}/images/[filename]", config.base_url());

    let app = server::app(state);

    axum::serve(listener, app).await?;

    Ok(())
}
