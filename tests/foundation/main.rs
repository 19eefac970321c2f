//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: names, type references, restriction flags, and errors.
