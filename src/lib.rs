pub mod commands;
pub mod config;
pub mod github;
pub mod http;
pub mod package;
pub mod registry;
pub mod resolver;
