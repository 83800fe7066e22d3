//! Integration tests for aiMate
//!
//! These tests verify that multiple components work together correctly.

#[path = "../common/mod.rs"]
pub mod common;

pub mod app_flow;
pub mod modal_lifecycle;
pub mod search_flow;
