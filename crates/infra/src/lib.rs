mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpConfig};
use repos::Repos;
pub use repos::{DueLoansQuery, ILoanRepo, InMemoryLoanRepo, MongoLoanRepo};
pub use services::*;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct ReeniContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailer>,
    /// Run-in-progress guard: at most one reminder dispatch is active at a
    /// time, no matter how it was triggered
    pub dispatch_lock: Arc<Mutex<()>>,
}

struct ContextParams {
    pub connection_string: String,
    pub db_name: String,
}

impl ReeniContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_mongodb(&params.connection_string, &params.db_name)
            .await
            .expect("Mongodb credentials must be set and valid");
        Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(SmtpMailer::new(&SmtpConfig::from_env())),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(InMemoryMailer::new()),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> ReeniContext {
    ReeniContext::create(ContextParams {
        connection_string: get_mongodb_connection_string(),
        db_name: get_mongodb_db_name(),
    })
    .await
}

fn get_mongodb_connection_string() -> String {
    const MONGODB_CONNECTION_STRING: &str = "MONGODB_CONNECTION_STRING";

    std::env::var(MONGODB_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", MONGODB_CONNECTION_STRING))
}

fn get_mongodb_db_name() -> String {
    const MONGODB_NAME: &str = "MONGODB_NAME";

    std::env::var(MONGODB_NAME).unwrap_or_else(|_| panic!("{} env var to be present.", MONGODB_NAME))
}
