//! Chess Onboard: signup wizards, login and session store for the
//! chess-coaching platform's auth API.

pub mod auth;
pub mod cli;
pub mod config;
pub mod devserver;
pub mod error;
pub mod notify;
pub mod reference;
pub mod routes;
pub mod store;
pub mod wizard;
