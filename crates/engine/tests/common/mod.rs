#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Category, CategoryInput, Customer, CustomerInput, Engine, Item, ItemInput, MoneyCents,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

pub async fn category(engine: &Engine, name: &str) -> Category {
    engine
        .create_category(CategoryInput {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
}

pub async fn item(engine: &Engine, name: &str, category_id: i32, cents: i64) -> Item {
    engine
        .create_item(ItemInput {
            name: name.to_string(),
            category_id,
            base_price: MoneyCents::new(cents),
            description: Some(format!("{name} description")),
        })
        .await
        .unwrap()
}

pub async fn customer(engine: &Engine, name: &str) -> Customer {
    engine
        .create_customer(CustomerInput {
            name: name.to_string(),
            phone: Some("555-0100".to_string()),
            email: None,
            address: None,
        })
        .await
        .unwrap()
}
