//! Integration tests for the dabk CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them needs a running Docker daemon.
