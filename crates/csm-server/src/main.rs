use csm_server::{ServerConfig, serve};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    serve(ServerConfig::from_env()).await
}
