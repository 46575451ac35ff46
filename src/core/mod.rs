//! Core domain logic: authentication, validation, persistence and configuration

pub mod auth;
pub mod config;
pub mod db;
pub mod validation;
