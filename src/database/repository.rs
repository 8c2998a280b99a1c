pub mod games_repository;
pub mod reviews_repository;
pub mod users_repository;
