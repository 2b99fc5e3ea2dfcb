//! Database seeder for Folio development and testing.
//!
//! Seeds the sample app catalog, a few inbox messages, and an admin profile,
//! then prints a bearer token for that admin.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use folio_core::auth::AdminAllowlist;
use folio_core::catalog::{AppRecordStore, NewApp};
use folio_db::repositories::insert_message;
use folio_db::{AppRepository, MessageRepository, UserRepository};
use folio_shared::{AppConfig, JwtConfig, JwtService};

/// Dev admin ID (consistent for all seeds)
const DEV_ADMIN_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
/// Dev admin email
const DEV_ADMIN_EMAIL: &str = "admin@folio.dev";

/// Sample catalog: title, description, category, tags.
const SAMPLE_APPS: [(&str, &str, &str, &[&str]); 6] = [
    (
        "Productivity Pro",
        "A powerful task management app that helps you stay organized and boost your productivity. Features include smart reminders, project tracking, and team collaboration.",
        "Productivity",
        &["iOS", "Android", "Task Management"],
    ),
    (
        "Photo Editor Plus",
        "Professional-grade photo editing tools in your pocket. Transform your photos with filters, effects, and advanced editing features.",
        "Photo & Video",
        &["iOS", "Android", "Photo Editing"],
    ),
    (
        "Finance Tracker",
        "Take control of your finances with an intuitive expense tracker. Monitor your spending, set budgets, and achieve your financial goals.",
        "Finance",
        &["iOS", "Finance", "Analytics"],
    ),
    (
        "Mindful Meditation",
        "Find peace and clarity with guided meditation sessions. Features relaxing sounds, breathing exercises, and personalized mindfulness programs.",
        "Health & Wellness",
        &["iOS", "Android", "Wellness"],
    ),
    (
        "Language Learner",
        "Master new languages with interactive lessons, speech recognition, and spaced repetition. Learn at your own pace with personalized courses.",
        "Education",
        &["iOS", "Android", "Education"],
    ),
    (
        "Weather Forecast",
        "Get accurate weather forecasts with beautiful visuals. Track multiple locations, receive alerts, and plan your activities with confidence.",
        "Weather",
        &["iOS", "Weather", "Forecasts"],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = Arc::new(
        folio_db::connect(&config.database.url)
            .await
            .context("Failed to connect to database")?,
    );

    println!("Seeding sample apps...");
    seed_apps(&db).await?;

    println!("Seeding messages...");
    seed_messages(&db).await?;

    println!("Seeding admin profile...");
    seed_admin(&db).await?;

    let jwt = JwtService::new(JwtConfig::from(&config.jwt));
    let token = jwt
        .generate_access_token(DEV_ADMIN_ID, Some(DEV_ADMIN_EMAIL))
        .context("Failed to mint admin token")?;
    println!("Admin bearer token (valid {} minutes):", config.jwt.access_token_expires_minutes);
    println!("{token}");

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the sample catalog when it is empty.
async fn seed_apps(db: &Arc<DatabaseConnection>) -> anyhow::Result<()> {
    let repo = AppRepository::new(Arc::clone(db));
    if repo.count().await? > 0 {
        println!("  Apps already exist, skipping...");
        return Ok(());
    }

    for (order, (title, description, category, tags)) in SAMPLE_APPS.iter().enumerate() {
        let slug = title.to_lowercase().replace(' ', "-");
        repo.create(NewApp {
            title: (*title).to_string(),
            description: (*description).to_string(),
            category: (*category).to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            download_link: Some(format!("https://example.com/download/{slug}")),
            display_order: Some(i32::try_from(order)?),
        })
        .await?;
        println!("  Created {title}");
    }
    Ok(())
}

/// Seeds two visitor messages when the inbox is empty.
async fn seed_messages(db: &Arc<DatabaseConnection>) -> anyhow::Result<()> {
    if MessageRepository::new(Arc::clone(db)).count().await? > 0 {
        println!("  Messages already exist, skipping...");
        return Ok(());
    }

    insert_message(
        db,
        "Jamie Rivera",
        "jamie@example.com",
        Some("Collaboration"),
        "Hi! I loved Photo Editor Plus. Are you open to freelance work?",
    )
    .await?;
    insert_message(
        db,
        "Sam Lee",
        "sam@example.com",
        None,
        "Is there an iPad version of Finance Tracker planned?",
    )
    .await?;
    Ok(())
}

/// Ensures the dev admin profile exists with the admin role.
async fn seed_admin(db: &Arc<DatabaseConnection>) -> anyhow::Result<()> {
    let allowlist = AdminAllowlist::parse(DEV_ADMIN_EMAIL);
    UserRepository::new(Arc::clone(db))
        .ensure_profile(DEV_ADMIN_ID, Some(DEV_ADMIN_EMAIL), &allowlist)
        .await?;
    Ok(())
}
