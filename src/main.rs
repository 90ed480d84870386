use clap::Parser;
use log::warn;
use ridealong::Mode;
use ridealong::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "ridealong", about = "Terminal client for shared rides")]
struct Args {
    /// Start as driver or passenger
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Backend base URL
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to ridealong.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("ridealong.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Falling back to default config: {}", e);
        config::RideConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            mode: args.mode,
            api_url: args.api_url,
        },
    );

    log::info!(
        "Ridealong starting up in {} mode against {}",
        resolved.mode.label(),
        resolved.api_base_url
    );

    ridealong::tui::run(resolved)
}
