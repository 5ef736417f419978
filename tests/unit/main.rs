//! Unit tests for the stagehand dispatch pipeline.
//!
//! These tests use mocked collaborators and run without network, prompt,
//! or home-directory I/O.

mod confirmation;
mod helpers;
mod orchestrator;
mod packager;
mod processor;
