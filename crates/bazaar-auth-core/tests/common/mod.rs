//! Common test utilities for bazaar-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::{test_config, MockCache, MockUserRepository};
