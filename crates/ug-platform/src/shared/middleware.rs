//! API Middleware
//!
//! Shared application state and the bearer-token extractor for Axum.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::password_service::PasswordService;
use crate::auth::session_service::SessionService;
use crate::auth::token_codec::TokenCodec;
use crate::principal::operations::{ActivateUserUseCase, CreateUserUseCase, SuspendUserUseCase};
use crate::principal::pager::PrincipalPager;
use crate::principal::repository::PrincipalRepository;
use crate::shared::authorization::AuthContext;
use crate::shared::clock::Clock;
use crate::shared::error::PlatformError;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub pager: Arc<PrincipalPager>,
    pub create_user: Arc<CreateUserUseCase>,
    pub suspend_user: Arc<SuspendUserUseCase>,
    pub activate_user: Arc<ActivateUserUseCase>,
}

impl AppState {
    pub fn new(
        principals: Arc<dyn PrincipalRepository>,
        passwords: Arc<PasswordService>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionService::new(
                principals.clone(),
                passwords.clone(),
                codec,
                clock.clone(),
            )),
            pager: Arc::new(PrincipalPager::new(principals.clone())),
            create_user: Arc::new(CreateUserUseCase::new(principals.clone(), passwords)),
            suspend_user: Arc::new(SuspendUserUseCase::new(principals.clone(), clock)),
            activate_user: Arc::new(ActivateUserUseCase::new(principals)),
        }
    }
}

/// Authenticated user extractor.
/// Resolves the `Authorization: Bearer` header into an [`AuthContext`].
pub struct Authenticated(pub AuthContext);

impl std::ops::Deref for Authenticated {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // non-UTF-8 header values count as missing
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let context = app_state.sessions.authenticate(header).await?;
        Ok(Authenticated(context))
    }
}
