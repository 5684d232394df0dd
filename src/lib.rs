//! Scop3P Assistant - Conversational access to protein modification data
//!
//! This crate answers natural-language questions over the Scop3P and Scop3PTM
//! databases. A turn is classified by a language model, answered directly or
//! routed to per-database SQL generation, enriched with project and mutation
//! data and summarized.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
