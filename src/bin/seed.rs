use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    seed::ensure_catalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    match ensure_catalog(&orm).await? {
        0 => println!("Catalog already populated, nothing to seed"),
        inserted => println!("Seeded {inserted} products"),
    }
    Ok(())
}
