// src/services/mod.rs
pub mod backend;
pub mod http_backend;

#[cfg(test)]
pub mod fake_backend;
