//! Shared library for the promo service: the signed promo-token codec,
//! HTTP wire types and configuration loading.

pub mod config;
pub mod promo;
pub mod types;
