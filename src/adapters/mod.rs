pub mod controllers;
pub mod dto;
pub mod error;
pub mod files;
pub mod renderers;
pub mod repositories;
pub mod state;
