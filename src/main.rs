use anyhow::Result;
use kgforge::generation::OpenAiGenerator;
use kgforge::server::HttpServer;
use kgforge::store::Neo4jStore;
use kgforge::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    log::info!("Starting kgforge v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;

    let api_key = std::env::var(&config.generation.api_key_env).map_err(|_| {
        anyhow::anyhow!(
            "Environment variable {} not set. Set it in your .env file or as an environment variable.",
            config.generation.api_key_env
        )
    })?;
    let generator = OpenAiGenerator::new(api_key, config.generation.model.clone());
    log::info!("Generation model: {}", config.generation.model);

    let store = Neo4jStore::from_env(&config.graph_store).await?;
    match &store {
        Some(_) => log::info!("Graph store configured; responses read back stored graphs"),
        None => log::info!("Graph store not configured; responses use generated graphs directly"),
    }

    let server = HttpServer::new(generator, store, &config);
    server.run().await?;

    Ok(())
}
