pub mod app;
pub mod catalog;
pub mod chat_request;
pub mod config;
pub mod message;
pub mod prompts;
