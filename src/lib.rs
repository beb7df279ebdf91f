pub mod config;
pub mod conjugation;
pub mod content;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod services;
pub mod srs;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;
