pub mod manager;
pub mod repository;
