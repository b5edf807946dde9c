//! API integration tests
//!
//! Integration tests for all API endpoints

mod poems_test;
