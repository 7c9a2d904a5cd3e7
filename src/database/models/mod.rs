pub mod auth;
pub mod result;
pub mod settings;
pub mod station;
pub mod team;

// Re-export all models for easy importing
pub use auth::*;
pub use result::*;
pub use settings::*;
pub use station::*;
pub use team::*;
