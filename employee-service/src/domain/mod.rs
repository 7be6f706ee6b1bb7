pub mod client;
pub mod employee;
pub mod service;
