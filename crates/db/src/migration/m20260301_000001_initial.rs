//! Initial database migration.
//!
//! Creates the enums, the profile, catalog, content and inbox tables, and the
//! `updated_at` trigger. Seeds one row per site section.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(APPS_SQL).await?;
        db.execute_unprepared(SITE_CONTENT_SQL).await?;
        db.execute_unprepared(MESSAGES_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 4: SEED SECTIONS
        // ============================================================
        db.execute_unprepared(SEED_SECTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('user', 'admin');
CREATE TYPE file_type AS ENUM ('apk', 'ipa');
CREATE TYPE section_name AS ENUM ('home_hero', 'about', 'contact');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255),
    full_name VARCHAR(255),
    avatar_url TEXT,
    role user_role NOT NULL DEFAULT 'user',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(lower(email));
";

const APPS_SQL: &str = r"
CREATE TABLE apps (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category VARCHAR(100) NOT NULL DEFAULT '',
    tags TEXT[] NOT NULL DEFAULT '{}',
    display_order INTEGER NOT NULL DEFAULT 0,
    download_link TEXT,
    file_path TEXT,
    file_name VARCHAR(255),
    file_size BIGINT CHECK (file_size IS NULL OR file_size >= 0),
    file_type file_type,
    download_count INTEGER NOT NULL DEFAULT 0 CHECK (download_count >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_apps_display_order ON apps(display_order, created_at);
";

const SITE_CONTENT_SQL: &str = r"
CREATE TABLE site_content (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    section_name section_name NOT NULL UNIQUE,
    title VARCHAR(255),
    subtitle VARCHAR(500),
    content JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MESSAGES_SQL: &str = r"
CREATE TABLE messages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    subject VARCHAR(500),
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    replied_at TIMESTAMPTZ,
    admin_response TEXT,
    CONSTRAINT chk_reply_complete CHECK ((replied_at IS NULL) = (admin_response IS NULL))
);

CREATE INDEX idx_messages_created ON messages(created_at DESC);
CREATE INDEX idx_messages_unreplied ON messages(created_at DESC) WHERE replied_at IS NULL;
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_apps_updated_at
    BEFORE UPDATE ON apps
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_site_content_updated_at
    BEFORE UPDATE ON site_content
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_SECTIONS_SQL: &str = r#"
INSERT INTO site_content (section_name, title, subtitle, content) VALUES
(
    'home_hero',
    'Hi, I build apps',
    'Mobile developer',
    '{"description": "I design and ship mobile apps for iOS and Android."}'::jsonb
),
(
    'about',
    'About Me',
    NULL,
    '{"description": "Developer focused on fast, friendly mobile apps.", "skills": ["Flutter", "Kotlin", "Swift"], "tools": ["Figma", "Android Studio", "Xcode"]}'::jsonb
),
(
    'contact',
    'Get in Touch',
    'I usually reply within a day',
    '{"description": "Have a project in mind? Send a message.", "email": "hello@example.com", "social_links": []}'::jsonb
);
"#;

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS messages;
DROP TABLE IF EXISTS site_content;
DROP TABLE IF EXISTS apps;
DROP TABLE IF EXISTS users;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TYPE IF EXISTS section_name;
DROP TYPE IF EXISTS file_type;
DROP TYPE IF EXISTS user_role;
";
