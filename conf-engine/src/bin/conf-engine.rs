use clap::Parser;
use conf_engine::cli::{ConfigCli, ConfigCliRunner};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = ConfigCli::parse();
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = ConfigCliRunner::run(cli, &mut stdout) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
