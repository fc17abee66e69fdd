pub mod dto;
pub mod repo_types;
mod services;
