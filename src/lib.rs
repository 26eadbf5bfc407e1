//! Growth prediction engine: daily activity journals in, next-day score,
//! burnout risk, improvement velocity and feature attribution out.
#![recursion_limit = "256"]

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
