use SpcKit::cli::cli_main::cli_main;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap_or_else(|e| eprintln!("logger init failed: {}", e));
    std::process::exit(cli_main());
}
