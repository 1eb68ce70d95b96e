pub mod config;
pub mod domain;
pub mod error;
pub mod providers;
pub mod repository;
pub mod services;
