pub mod dto;
pub mod models;
