use clap::Parser;
use rent_cli::{execute, Cli};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,rent_core=info,rent_adapters=info,rent_cli=info";

fn main() {
    rent_persistence::init_dotenv();
    // los crates de librería emiten por `log`; el subscriber los recoge
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
                             .with_writer(std::io::stderr)
                             .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    if let Err(e) = execute(cli, std::env::vars(), &mut stdout.lock()) {
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }
}
