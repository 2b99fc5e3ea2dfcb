//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `user_role` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Signed-in visitor.
    #[sea_orm(string_value = "user")]
    User,
    /// Site owner.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// `file_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "file_type")]
pub enum FileType {
    /// Android package.
    #[sea_orm(string_value = "apk")]
    Apk,
    /// iOS app archive.
    #[sea_orm(string_value = "ipa")]
    Ipa,
}

/// `section_name` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "section_name")]
pub enum SectionName {
    /// Landing hero.
    #[sea_orm(string_value = "home_hero")]
    HomeHero,
    /// About section.
    #[sea_orm(string_value = "about")]
    About,
    /// Contact section.
    #[sea_orm(string_value = "contact")]
    Contact,
}
