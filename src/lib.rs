pub mod alm;
pub mod commands;
pub mod config;
pub mod http;
pub mod poll;
pub mod runtime;
