//! Spotify Web API integration
//!
//! Resolves a guessed title/artist to a canonical album record. Authentication
//! uses the client-credentials grant; a fresh token is requested every run.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod auth;
mod client;

pub use adapter::to_catalog_match;
pub use auth::{SpotifyAuthClient, basic_auth_header};
pub use client::{SpotifyClient, search_query};
