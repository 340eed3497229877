pub mod network_types;
pub mod scan_types;
pub mod settings_types;
