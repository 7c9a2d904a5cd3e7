pub mod auth;
pub mod events;
pub mod ranking;
pub mod results;
pub mod settings;
pub mod shared;
pub mod stations;
pub mod teams;
