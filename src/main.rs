use database::{DemoLoader, DocumentStore, FileStore, InMemoryStore};
use env_logger::Env;
use log::info;
use std::sync::Arc;
use std::time::Instant;
use web::{CoachAppData, CoachServer, ServerConfig};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default()
        .default_filter_or("debug")
    ).init();

    let config = ServerConfig::from_env();

    let store: Arc<dyn DocumentStore> = match &config.data_dir {
        Some(dir) => {
            info!("documents stored under {}", dir.display());
            Arc::new(FileStore::new(dir))
        }
        None => {
            info!("DATA_DIR not set, documents kept in memory");
            Arc::new(InMemoryStore::new())
        }
    };

    if config.demo_mode || config.data_dir.is_none() {
        let started = Instant::now();
        let user_id = DemoLoader::load(Arc::clone(&store)).await?;

        info!(
            "demo data loaded for '{}': {} ms",
            user_id,
            started.elapsed().as_millis()
        );
    }

    let data = CoachAppData::new(store, config);

    CoachServer::new(data).run().await?;

    Ok(())
}
