//! Unit tests for the offline delivery queue.
