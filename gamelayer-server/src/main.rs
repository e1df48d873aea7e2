use clap::Parser;
use gamelayer_server::{ServerConfig, serve};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = serve(ServerConfig::parse()).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
