pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod participant;
pub mod session;
pub mod settings;
pub mod tools;
pub mod ui;

pub use error::{CommanderError, Result};
pub use participant::CommanderParticipant;
