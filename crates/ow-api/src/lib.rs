//! Fetch layer for orderwatch.
//!
//! Thin clients for the vendor's login and order endpoints: PKCE login
//! helpers, token persistence and expiry checks, and the [`OrderSource`]
//! seam that produces the "new" snapshot for each comparison.

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod token;

pub use auth::{code_challenge, AuthClient, PkceSession, RefreshedAccess};
pub use client::{fetch_detailed_orders, OrderSource, OwnerApiClient};
pub use endpoint::{endpoints, Endpoints, Locale};
pub use error::{ApiError, ApiResult};
pub use token::{access_token_expiry, TokenStore, Tokens};
