pub mod article;
pub mod audit;
pub mod auth;
pub mod chat;
pub mod config;
pub mod http;
pub mod link;
pub mod summarizer;
pub mod util;
