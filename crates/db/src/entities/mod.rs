//! `SeaORM` entity definitions.

pub mod apps;
pub mod messages;
pub mod sea_orm_active_enums;
pub mod site_content;
pub mod users;
