mod loan;
mod shared;

use mongodb::{bson::Document, options::ClientOptions, Client};
use std::sync::Arc;
use tracing::info;

pub use loan::{DueLoansQuery, ILoanRepo, InMemoryLoanRepo, MongoLoanRepo};

#[derive(Clone)]
pub struct Repos {
    pub loans: Arc<dyn ILoanRepo>,
}

impl Repos {
    pub async fn create_mongodb(
        connection_string: &str,
        db_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION ...");
        db.collection::<Document>("server-start")
            .insert_one(
                mongodb::bson::doc! {
                "server-start": 1
                },
                None,
            )
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            loans: Arc::new(MongoLoanRepo::new(&db)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            loans: Arc::new(InMemoryLoanRepo::new()),
        }
    }
}
