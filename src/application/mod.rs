pub mod cache_agent;
pub mod error;
pub mod repositories;
pub mod services;
pub mod upload_controller;
