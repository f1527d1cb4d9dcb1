//! Create User Use Case

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::password_service::PasswordService;
use crate::principal::entity::{NewPrincipal, Principal, Role};
use crate::principal::repository::PrincipalRepository;
use crate::shared::authorization::{checks, AuthContext};
use crate::shared::error::{PlatformError, Result};
use crate::usecase::{FieldFailure, UseCaseError, UseCaseResult};

/// Command for creating a new user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,

    /// Defaults to BASIC
    pub role: Option<Role>,
}

/// Use case for creating a new user. Administrators only.
pub struct CreateUserUseCase {
    principals: Arc<dyn PrincipalRepository>,
    passwords: Arc<PasswordService>,
}

impl CreateUserUseCase {
    pub fn new(principals: Arc<dyn PrincipalRepository>, passwords: Arc<PasswordService>) -> Self {
        Self { principals, passwords }
    }

    /// Role failures are errors; input problems come back as `Failure`.
    pub async fn execute(&self, command: CreateUserCommand, ctx: &AuthContext) -> Result<UseCaseResult<Principal>> {
        checks::require_admin(ctx)?;

        let name = command.name.trim();
        let email = command.email.trim();

        let mut field_failures = Vec::new();
        if name.is_empty() {
            field_failures.push(FieldFailure::new("name", "Name is required"));
        }
        if email.is_empty() {
            field_failures.push(FieldFailure::new("email", "Email is required"));
        }
        if command.password.is_empty() {
            field_failures.push(FieldFailure::new("password", "Password is required"));
        }
        if command.password_confirmation.is_empty() {
            field_failures.push(FieldFailure::new("passwordConfirmation", "Password confirmation is required"));
        }
        if !field_failures.is_empty() {
            return Ok(UseCaseResult::failure(UseCaseError::fields(field_failures)));
        }

        if command.password != command.password_confirmation {
            return Ok(UseCaseResult::failure(UseCaseError::message("Passwords do not match")));
        }

        if self.principals.find_by_email(email).await?.is_some() {
            return Ok(UseCaseResult::failure(UseCaseError::message("User exists")));
        }

        let created = self
            .principals
            .create(NewPrincipal {
                name: name.to_string(),
                email: email.to_string(),
                role: command.role.unwrap_or_default(),
                password_digest: self.passwords.hash_password(&command.password)?,
            })
            .await;

        // a concurrent create can claim the email after the lookup above
        let principal = match created {
            Ok(principal) => principal,
            Err(PlatformError::Duplicate { .. }) => {
                warn!(email = %email, admin_id = ctx.user_id(), "User create lost a race on email");
                return Ok(UseCaseResult::failure(UseCaseError::message("User exists")));
            }
            Err(e) => return Err(e),
        };

        info!(
            user_id = principal.id,
            role = principal.role.as_str(),
            admin_id = ctx.user_id(),
            "User created"
        );

        Ok(UseCaseResult::success(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password_service::Argon2Config;
    use crate::principal::repository::{InMemoryPrincipalRepository, PrincipalFilter};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    struct Fixture {
        repo: Arc<InMemoryPrincipalRepository>,
        use_case: CreateUserUseCase,
        admin: AuthContext,
        basic: AuthContext,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryPrincipalRepository::new());
        let passwords = Arc::new(PasswordService::new(Argon2Config::testing()).unwrap());

        let mut ids = Vec::new();
        for (email, role) in [("admin@example.com", Role::Admin), ("basic@example.com", Role::Basic)] {
            let p = repo
                .create(NewPrincipal {
                    name: email.to_string(),
                    email: email.to_string(),
                    role,
                    password_digest: String::new(),
                })
                .await
                .unwrap();
            ids.push(AuthContext::new(p, None));
        }
        let basic = ids.pop().unwrap();
        let admin = ids.pop().unwrap();

        Fixture {
            use_case: CreateUserUseCase::new(repo.clone(), passwords),
            repo,
            admin,
            basic,
        }
    }

    fn command() -> CreateUserCommand {
        CreateUserCommand {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password: "pw-123456".to_string(),
            password_confirmation: "pw-123456".to_string(),
            role: None,
        }
    }

    fn failure(result: UseCaseResult<Principal>) -> UseCaseError {
        match result {
            UseCaseResult::Failure(e) => e,
            UseCaseResult::Success(p) => panic!("expected failure, created {:?}", p),
        }
    }

    #[tokio::test]
    async fn test_creates_basic_user() {
        let f = fixture().await;
        let result = f.use_case.execute(command(), &f.admin).await.unwrap();

        let UseCaseResult::Success(user) = result else { panic!("expected success") };
        assert_eq!(user.role, Role::Basic);
        assert_eq!(user.email, "grace@example.com");
        assert!(user.password_digest.starts_with("$argon2id$"));
        assert_eq!(f.repo.count(PrincipalFilter::All).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_basic_user_is_unauthorized() {
        let f = fixture().await;
        let result = f.use_case.execute(command(), &f.basic).await;
        assert!(matches!(result, Err(PlatformError::Unauthorized { .. })));
        assert_eq!(f.repo.count(PrincipalFilter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_required_fields_reported_together() {
        let f = fixture().await;
        let err = failure(f.use_case.execute(CreateUserCommand::default(), &f.admin).await.unwrap());

        let fields: Vec<&str> = err.field_failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password", "passwordConfirmation"]);
        assert_eq!(err.failure_message, None);
        assert_eq!(f.repo.count(PrincipalFilter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_name() {
        let f = fixture().await;
        let err = failure(
            f.use_case
                .execute(CreateUserCommand { name: "  ".to_string(), ..command() }, &f.admin)
                .await
                .unwrap(),
        );
        assert_eq!(err.field_failures, vec![FieldFailure::new("name", "Name is required")]);
    }

    #[tokio::test]
    async fn test_password_mismatch() {
        let f = fixture().await;
        let cmd = CreateUserCommand { password_confirmation: "other".to_string(), ..command() };
        let err = failure(f.use_case.execute(cmd, &f.admin).await.unwrap());
        assert_eq!(err.failure_message.as_deref(), Some("Passwords do not match"));
        assert_eq!(f.repo.count(PrincipalFilter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let f = fixture().await;
        let cmd = CreateUserCommand { email: "basic@example.com".to_string(), ..command() };
        let err = failure(f.use_case.execute(cmd, &f.admin).await.unwrap());
        assert_eq!(err.failure_message.as_deref(), Some("User exists"));
        assert_eq!(f.repo.count(PrincipalFilter::All).await.unwrap(), 2);
    }

    /// Store whose email lookup never sees rows, as when another request
    /// inserts the same email between the lookup and the insert.
    struct StaleLookupRepository(InMemoryPrincipalRepository);

    #[async_trait]
    impl PrincipalRepository for StaleLookupRepository {
        async fn find_by_id(&self, id: i64) -> Result<Option<Principal>> {
            self.0.find_by_id(id).await
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<Principal>> {
            Ok(None)
        }

        async fn create(&self, principal: NewPrincipal) -> Result<Principal> {
            self.0.create(principal).await
        }

        async fn update_suspended_at(&self, id: i64, value: Option<DateTime<Utc>>) -> Result<Principal> {
            self.0.update_suspended_at(id, value).await
        }

        async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
            self.0.record_login(id, at).await
        }

        async fn count(&self, filter: PrincipalFilter) -> Result<i64> {
            self.0.count(filter).await
        }

        async fn list(&self, filter: PrincipalFilter, skip: i64, take: i64) -> Result<Vec<Principal>> {
            self.0.list(filter, skip, take).await
        }
    }

    #[tokio::test]
    async fn test_duplicate_rejected_at_insert_is_user_exists() {
        let f = fixture().await;
        let repo = Arc::new(StaleLookupRepository(InMemoryPrincipalRepository::new()));
        let passwords = Arc::new(PasswordService::new(Argon2Config::testing()).unwrap());
        let use_case = CreateUserUseCase::new(repo.clone(), passwords);

        let first = use_case.execute(command(), &f.admin).await.unwrap();
        assert!(first.is_success());

        let err = failure(use_case.execute(command(), &f.admin).await.unwrap());
        assert_eq!(err.failure_message.as_deref(), Some("User exists"));
        assert!(err.field_failures.is_empty());
        assert_eq!(repo.count(PrincipalFilter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_rejected_at_insert_serializes_as_failure() {
        let f = fixture().await;
        let repo = Arc::new(StaleLookupRepository(InMemoryPrincipalRepository::new()));
        let passwords = Arc::new(PasswordService::new(Argon2Config::testing()).unwrap());
        let use_case = CreateUserUseCase::new(repo, passwords);

        use_case.execute(command(), &f.admin).await.unwrap();
        let result = use_case.execute(command(), &f.admin).await.unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "FAILURE");
        assert_eq!(json["failureMessage"], "User exists");
    }
}
