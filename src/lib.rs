// VIN Decoder Library
// Re-export modules for use in main.rs

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod reference;
pub mod sources;
pub mod vin;
pub mod wmi;
