//! Core library for the `logstress` CLI.
//!
//! This crate provides the building blocks used by the binary: a
//! bounded-concurrency batch runner over a pluggable JSON transport, request
//! builders for the log server's `insert` and `query_all` actions, run
//! statistics, CLI argument types and configuration parsing. The primary
//! user-facing interface is the `logstress` command-line application.
pub mod args;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runner;
pub mod workload;
