//! Unit tests for the conversation archive.
