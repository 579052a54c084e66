//! Unit tests for the session engine.
