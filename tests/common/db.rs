// Fixtures para os testes que precisam de um Postgres real.
// Rode com: DATABASE_URL=... cargo test -- --ignored

use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida")
}

pub async fn connect() -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&database_url())
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

/// Cliente com um pet e um serviço de R$ 50,00
pub struct CustomerFixture {
    pub user_id: Uuid,
    pub customer_id: Uuid,
    pub pet_id: Uuid,
    pub service_id: Uuid,
}

pub async fn insert_user(pool: &PgPool, role: &str) -> Uuid {
    let email = format!("teste_{}@7pet.test", Uuid::new_v4().simple());

    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, role) VALUES ('Teste', $1, 'x', $2::user_role) RETURNING id",
    )
    .bind(&email)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_customer(pool: &PgPool) -> CustomerFixture {
    let user_id = insert_user(pool, "CLIENTE").await;

    let customer_id: Uuid =
        sqlx::query_scalar("INSERT INTO customers (user_id) VALUES ($1) RETURNING id")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();

    let pet_id: Uuid = sqlx::query_scalar(
        "INSERT INTO pets (customer_id, name, species) VALUES ($1, 'Thor', 'Cachorro') RETURNING id",
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let service_id: Uuid = sqlx::query_scalar(
        "INSERT INTO services (name, base_price) VALUES ('Banho', $1) RETURNING id",
    )
    .bind(Decimal::new(5000, 2))
    .fetch_one(pool)
    .await
    .unwrap();

    CustomerFixture { user_id, customer_id, pet_id, service_id }
}

/// `status` vai cru para a coluna TEXT, então aceita os literais antigos
pub async fn insert_quote(pool: &PgPool, customer: &CustomerFixture, status: &str, is_recurring: bool) -> Uuid {
    let total = if is_recurring { Decimal::new(20000, 2) } else { Decimal::new(5000, 2) };

    sqlx::query_scalar(
        r#"
        INSERT INTO quotes (customer_id, pet_id, service_id, status, is_recurring, total)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(customer.customer_id)
    .bind(customer.pet_id)
    .bind(customer.service_id)
    .bind(status)
    .bind(is_recurring)
    .bind(total)
    .fetch_one(pool)
    .await
    .unwrap()
}
