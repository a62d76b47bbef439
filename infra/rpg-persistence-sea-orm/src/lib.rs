use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use thiserror::Error;

pub mod entity;
pub mod players;

#[derive(Debug, Error)]
pub enum DatabaseUrlError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
}

/// `RPG_DATABASE_URL`, or a MariaDB url assembled from the `MARIADB_*` variables.
pub fn database_url_from_env() -> Result<String, DatabaseUrlError> {
    if let Ok(url) = std::env::var("RPG_DATABASE_URL") {
        return Ok(url);
    }
    let var = |name: &'static str| std::env::var(name).map_err(|_| DatabaseUrlError::MissingVar(name));
    let mariadb_database = var("MARIADB_DATABASE")?;
    let mariadb_user = var("MARIADB_USER")?;
    let mariadb_password = var("MARIADB_PASSWORD")?;
    let mariadb_host = var("MARIADB_HOST")?;
    let mariadb_port = var("MARIADB_PORT")?;
    Ok(format!(
        "mysql://{}:{}@{}:{}/{}",
        mariadb_user, mariadb_password, mariadb_host, mariadb_port, mariadb_database
    ))
}

pub async fn create_db_pool(
    db_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// Creates the `player` table unless it already exists.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut player_table = schema.create_table_from_entity(entity::player::Entity);
    player_table.if_not_exists();

    db.execute(backend.build(&player_table)).await?;
    log::info!("Ensured player table exists");
    Ok(())
}
