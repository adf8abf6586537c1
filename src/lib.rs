pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod repository;
pub mod session;
pub mod testing;
