//! Shared application state
//!
//! Built once in `main` and handed to every worker as `web::Data<AppState>`.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Database;
use crate::repositories::search::SearchRepository;
use crate::repositories::users::UserStore;
use crate::services::auth::{AuthService, TokenService, TwoFactorService};
use crate::services::mail::{MailService, MailTransport};
use crate::services::search::SearchService;
use crate::services::users::UserService;

pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub auth: AuthService,
    pub two_factor: TwoFactorService,
    pub users: UserService,
    pub search: SearchService,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        database: Database,
        user_store: Arc<dyn UserStore>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt));
        let mail = MailService::new(transport, config.mail.from.clone());

        Self {
            auth: AuthService::new(
                user_store.clone(),
                tokens.clone(),
                mail.clone(),
                config.password.clone(),
            ),
            two_factor: TwoFactorService::new(
                user_store.clone(),
                tokens.clone(),
                mail,
                config.two_factor.clone(),
            ),
            users: UserService::new(user_store),
            search: SearchService::new(SearchRepository::new(database)),
            tokens,
        }
    }
}
