//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! pipeline end-to-end against them.

mod collector_tests;
mod pagination_tests;
mod support;
