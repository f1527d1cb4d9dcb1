//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use ug_platform::auth::{Argon2Config, PasswordService, TokenCodec, TokenConfig};
use ug_platform::principal::{InMemoryPrincipalRepository, NewPrincipal, Principal, PrincipalRepository, Role};
use ug_platform::{AppState, ManualClock};

pub const NOW: i64 = 1_700_000_000;
pub const SECRET: &str = "integration-secret";
pub const PASSWORD: &str = "hunter22";

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub repo: Arc<InMemoryPrincipalRepository>,
    pub passwords: Arc<PasswordService>,
    pub codec: Arc<TokenCodec>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::at(NOW));
        let repo = Arc::new(InMemoryPrincipalRepository::new());
        let passwords = Arc::new(PasswordService::new(Argon2Config::testing()).unwrap());
        let codec = Arc::new(TokenCodec::new(TokenConfig::new(SECRET), clock.clone()).unwrap());
        let state = AppState::new(repo.clone(), passwords.clone(), codec.clone(), clock.clone());

        Self { clock, repo, passwords, codec, state }
    }

    pub async fn add_user(&self, email: &str, role: Role) -> Principal {
        self.repo
            .create(NewPrincipal {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                role,
                password_digest: self.passwords.hash_password(PASSWORD).unwrap(),
            })
            .await
            .unwrap()
    }

    pub fn bearer(&self, user_id: i64, shadowing: Option<i64>) -> String {
        format!("Bearer {}", self.codec.issue(user_id, shadowing).unwrap())
    }
}
