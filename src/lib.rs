pub mod analysis;
pub mod app;
pub mod auth;
pub mod config;
pub mod feeds;
pub mod fetcher;
pub mod logging;
pub mod report;
pub mod stream;
