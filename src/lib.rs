pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod quiz;
pub mod store;
pub mod templates;

use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::AppConfig;
use store::{BookingStore, TriviaStore};

// Shared state of the Fyyur site
#[derive(Clone)]
pub struct FyyurState {
    pub store: Arc<dyn BookingStore>,
}

impl FyyurState {
    pub fn new(store: Arc<dyn BookingStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

// Shared state of the Trivia API
#[derive(Clone)]
pub struct TriviaState {
    pub store: Arc<dyn TriviaStore>,
}

impl TriviaState {
    pub fn new(store: Arc<dyn TriviaStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

/// Installs the global subscriber: `RUST_LOG` filtering, plain or JSON lines.
pub fn init_tracing(config: &AppConfig) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(&config.rust_log));
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
