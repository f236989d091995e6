pub mod api;
pub mod cli;
pub mod core;
pub mod filter;
pub mod graph;
pub mod mail;
