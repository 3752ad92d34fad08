pub mod binance;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod history;
pub mod input;
pub mod model;
pub mod ui;
