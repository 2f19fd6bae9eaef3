use automa_voice_lib::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = automa_voice_lib::run(cli).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}
