// Authentication module
// Manages the Zoom credential lifecycle and OAuth token exchanges

mod jwt;
mod manager;
mod oauth;
mod types;

pub use jwt::decode_expiry;
pub use manager::TokenManager;
pub use oauth::OAuthClient;
pub use types::{Credential, TokenData};
