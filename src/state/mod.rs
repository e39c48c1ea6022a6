use std::sync::Arc;

use crate::db::{poll_store::PollStore, refresh_store::RefreshStore, user_store::UserStore};
use crate::utils::tokens::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub polls: Arc<dyn PollStore>,
    pub users: Arc<dyn UserStore>,
    pub refresh_tokens: Arc<dyn RefreshStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        polls: Arc<dyn PollStore>,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshStore>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            polls,
            users,
            refresh_tokens,
            tokens,
        }
    }
}
