//! Endpoint handlers

pub mod health;
pub mod pull_requests;
pub mod teams;
pub mod users;
