pub mod result;
pub mod settings;
pub mod station;
pub mod team;

// Re-export all repositories for easy importing
pub use result::ResultRepository;
pub use settings::SettingsRepository;
pub use station::StationRepository;
pub use team::TeamRepository;
