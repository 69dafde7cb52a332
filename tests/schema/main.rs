//! Integration tests for Layer 2: Schema
//!
//! Tests for parsed and compiled trees and node shape dispatch.

mod builtins;
mod dispatch;
mod trees;
