//! Core library exports for the storefront service.
//!
//! This crate exposes the catalog domain, the product edit form, the catalog
//! client and the service and route layers used by the storefront web
//! application.

pub mod domain;
pub mod forms;
pub mod models;

#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
