use mongodb::{
    bson::doc, options::ClientOptions, options::IndexOptions, Client, Database, IndexModel,
};
use tracing::info;

use crate::config::Config;
use crate::models::{poll_models::Poll, user_models::User};
use crate::utils::error::{AppError, AppResult};

pub async fn init_db(config: &Config) -> AppResult<Database> {
    let mut client_options = ClientOptions::parse(&config.mongo_uri)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse MongoDB URI: {}", e)))?;

    client_options.app_name = Some("Pollcast".to_string());

    let client = Client::with_options(client_options).map_err(|e| {
        AppError::DatabaseError(format!("Failed to initialize MongoDB client: {}", e))
    })?;

    let db = client.database(&config.db_name);
    ensure_indexes(&db).await?;

    info!("Database connection successful");

    Ok(db)
}

/// Unique indexes backing the duplicate-question and duplicate-email
/// rejections. Insert-time violations surface as E11000 write errors.
async fn ensure_indexes(db: &Database) -> AppResult<()> {
    let unique = IndexOptions::builder().unique(true).build();

    db.collection::<Poll>("polls")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "question": 1 })
                .options(unique.clone())
                .build(),
        )
        .await?;

    db.collection::<User>("users")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique)
                .build(),
        )
        .await?;

    Ok(())
}
