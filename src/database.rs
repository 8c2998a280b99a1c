pub mod connection;
pub mod dto;
pub mod repository;
pub mod seed;
pub mod service;
