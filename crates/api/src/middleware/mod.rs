pub mod auth;
pub mod recovery;
