#![cfg(not(doctest))]

pub mod auth;
pub mod cms;
pub mod directory;
pub mod friends;
pub mod mock_data;
pub mod models;
pub mod retry;
pub mod session;
pub mod validators;
