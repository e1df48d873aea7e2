//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;
use gamelayer::{
    backend::StoreBackendBuilder,
    error::DocumentStoreResult,
    memory::InMemoryStore,
    mongodb::MongoDbStore,
    store::{DocumentStore, DynDocumentStore},
};

/// Games catalog REST service.
#[derive(Debug, Clone, Parser)]
#[command(name = "gamelayer-server", version, about)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "GAMES_BIND", default_value = "0.0.0.0:5001")]
    pub bind: SocketAddr,

    /// MongoDB connection string. Games are kept in memory when absent.
    #[arg(long, env = "MONGO_CONNECTION_STRING")]
    pub mongo_uri: Option<String>,

    /// MongoDB database holding the games collection.
    #[arg(long, env = "GAMES_DATABASE", default_value = "games")]
    pub database: String,

    /// Load the sample catalog when the store is empty.
    #[arg(long, env = "GAMES_SEED")]
    pub seed: bool,
}

impl ServerConfig {
    /// Opens the configured backend behind a type-erased store.
    pub async fn open_store(&self) -> DocumentStoreResult<DynDocumentStore> {
        match self.mongo_uri.as_deref().filter(|uri| !uri.trim().is_empty()) {
            Some(uri) => {
                log::info!("storing games in MongoDB database {}", self.database);

                let backend = MongoDbStore::builder(uri, &self.database)
                    .app_name(env!("CARGO_PKG_NAME"))
                    .build()
                    .await?;

                Ok(DocumentStore::new(backend).into_dyn())
            }
            None => {
                log::info!("no MongoDB connection string configured; storing games in memory");

                Ok(DocumentStore::new(InMemoryStore::builder().build().await?).into_dyn())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_setup() {
        let config = ServerConfig::try_parse_from(["gamelayer-server"]).unwrap();

        assert_eq!(config.bind, "0.0.0.0:5001".parse().unwrap());
        assert_eq!(config.database, "games");
        assert!(!config.seed);
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "gamelayer-server",
            "--bind",
            "127.0.0.1:8080",
            "--mongo-uri",
            "mongodb://localhost:27017",
            "--database",
            "catalog",
            "--seed",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.mongo_uri.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(config.database, "catalog");
        assert!(config.seed);
    }

    #[tokio::test]
    async fn blank_connection_string_falls_back_to_memory() {
        let config = ServerConfig::try_parse_from(["gamelayer-server", "--mongo-uri", " "]).unwrap();

        let store = config.open_store().await.unwrap();

        assert!(store.shutdown().await.is_ok());
    }
}
