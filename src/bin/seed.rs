use chrono::Utc;

use cafe_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    services::{auth_service::ensure_admin_user, today},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    ensure_admin_user(&pool, &config.admin_username, &config.admin_password).await?;
    seed_categories(&pool).await?;
    seed_products(&pool).await?;
    seed_specials(&pool).await?;
    seed_page_content(&pool).await?;

    println!("Seed completed. Admin user: {}", config.admin_username);
    Ok(())
}

async fn seed_categories(pool: &DbPool) -> anyhow::Result<()> {
    let categories = [
        ("bebidas", "Bebidas", "Cafés, tés y bebidas frías", "coffee"),
        ("panaderia", "Panadería", "Bollería y pan recién horneado", "croissant"),
        ("postres", "Postres", "Tartas y dulces caseros", "cake"),
    ];

    for (id, name, description, icon) in categories {
        sqlx::query(
            r#"
            INSERT INTO product_categories (id, name, description, icon, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    }

    println!("Seeded categories");
    Ok(())
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("Products already present, skipping");
        return Ok(());
    }

    let products = [
        ("Café con leche", "Espresso con leche cremosa", 2.50, "bebidas"),
        ("Cappuccino", "Espresso, leche y espuma", 2.80, "bebidas"),
        ("Té matcha", "Matcha ceremonial con leche de avena", 3.20, "bebidas"),
        ("Croissant", "Croissant de mantequilla", 1.80, "panaderia"),
        ("Pan de masa madre", "Hogaza de fermentación lenta", 4.50, "panaderia"),
        ("Tarta de queso", "Tarta de queso al horno", 4.20, "postres"),
        ("Brownie", "Brownie de chocolate negro", 3.00, "postres"),
    ];

    for (name, description, price, category) in products {
        sqlx::query(
            r#"
            INSERT INTO products (name, description, price, category, image, available)
            VALUES ($1, $2, $3, $4, '', 1)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_specials(pool: &DbPool) -> anyhow::Result<()> {
    let date = today().format("%Y-%m-%d").to_string();
    let specials = [("Cappuccino", 20.0), ("Tarta de queso", 15.0)];

    for (name, discount) in specials {
        sqlx::query(
            r#"
            INSERT INTO specials (product_id, date, discount)
            SELECT p.id, $2, $3 FROM products p
            WHERE p.name = $1
              AND NOT EXISTS (SELECT 1 FROM specials s WHERE s.product_id = p.id AND s.date = $2)
            "#,
        )
        .bind(name)
        .bind(date.as_str())
        .bind(discount)
        .execute(pool)
        .await?;
    }

    println!("Seeded specials for {date}");
    Ok(())
}

async fn seed_page_content(pool: &DbPool) -> anyhow::Result<()> {
    let blocks = [
        (
            "home-hero",
            "Bienvenido a nuestro café",
            "Café de especialidad y repostería casera cada día.",
            "hero",
            "home",
        ),
        (
            "about-story",
            "Nuestra historia",
            "Un pequeño café de barrio con grandes ideas.",
            "story",
            "about",
        ),
    ];

    for (id, title, content, section, page) in blocks {
        sqlx::query(
            r#"
            INSERT INTO page_content (id, title, content, section, page, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(section)
        .bind(page)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    }

    println!("Seeded page content");
    Ok(())
}
