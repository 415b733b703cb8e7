use mbrowser::{config::Config, db, populate, repository::Repository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,mbrowser=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let db = db::connect_and_migrate(&config.database_url, config.sql_echo).await?;
    if config.reset_database {
        db::reset(&db).await?;
    }

    let repo = Repository::new(db.clone());
    let movies = repo.get_number_of_movies().await?;
    if movies > 0 {
        tracing::info!(movies, database = %config.database_url, "database already populated");
        return Ok(());
    }

    tracing::info!(data_path = %config.data_path.display(), "populating database");
    populate::populate(&db, &config.data_path).await?;

    Ok(())
}
