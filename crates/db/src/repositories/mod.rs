//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod app;
pub mod dashboard;
pub mod message;
pub mod site_content;
pub mod user;

pub use app::AppRepository;
pub use dashboard::DashboardRepository;
pub use message::{MessageRepository, ReplyOutcome, insert_message};
pub use site_content::SiteContentRepository;
pub use user::{UserRepository, to_principal};
