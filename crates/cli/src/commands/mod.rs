//! CLI command implementations

pub mod containers;
pub mod history;
pub mod images;
pub mod networks;
pub mod profiles;
pub mod system;
pub mod volumes;
