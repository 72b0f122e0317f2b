// Testing Tools Library
//
// This crate provides testing utilities and tools for the Kanban Board API.
// Currently includes:
// - sse-test-client: end-to-end check that mutations reach open event streams

pub mod api_client;
pub mod auth;
pub mod output;
pub mod scenarios;
pub mod sse_client;
