//! Display of executed HTTP requests inside an editing host, and the
//! bookkeeping that keeps result documents, their annotations and their
//! temporary files in step with what the host has open.

pub mod config;
pub mod content;
pub mod exchange;
pub mod handlers;
pub mod host;
pub mod output;
