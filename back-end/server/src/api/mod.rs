pub mod blog;
pub mod dto;
pub mod servers;
