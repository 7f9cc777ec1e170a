pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
pub mod templates;
pub mod utils;
