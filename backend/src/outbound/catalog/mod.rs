//! Catalog outbound adapter.
//!
//! A thin reqwest implementation of the `CatalogRepository` port against a
//! Strapi-style REST API.

mod dto;
mod http_repository;

pub use http_repository::CatalogHttpRepository;
