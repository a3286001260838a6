//! Integration tests for the vehicle repositories.
//!
//! Every test builds its own in-memory database, seeded with the 29
//! `read-Name-*` vehicles where reads are exercised:
//! - context: registry lookups and configuration
//! - reading: get / count / page through both read repositories
//! - command: factory-driven writes, including add_or_update
//! - writing: hook-driven writes, native upsert and bulk upsert
//! - specs: specification adapters over any repository

mod command;
mod reading;
mod specs;
