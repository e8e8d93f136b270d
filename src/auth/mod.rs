//! Auth API: wire types, the HTTP client, and store-bound actions.

pub mod actions;
pub mod client;
pub mod model;

pub use actions::{ActionResult, AuthActions};
pub use client::{AuthApi, HttpAuthClient};
pub use model::{AuthSession, User};
