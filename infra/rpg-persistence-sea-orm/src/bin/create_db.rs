use rpg_persistence_sea_orm::{create_db_pool, create_schema, database_url_from_env};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_url = database_url_from_env().expect("Failed to read database url");
    let pool = create_db_pool(&db_url, 1)
        .await
        .expect("Failed to connect to database");

    create_schema(&pool)
        .await
        .expect("Failed to create player table");

    println!("Created database tables successfully");
}
