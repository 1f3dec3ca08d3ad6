//! Bazaar API library
//!
//! Configuration, state, error mapping and handlers shared by the
//! `bazaar-api` binary and its HTTP tests.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;
