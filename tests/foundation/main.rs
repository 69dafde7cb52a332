//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Error, ErrorCode, Diagnostic, and revision dates.
