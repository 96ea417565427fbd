pub mod app_state;
pub mod extractors;
pub mod jwt_middleware;
pub mod rest;
