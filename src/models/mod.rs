pub mod poll_models;
pub mod refresh_token_models;
pub mod user_models;
