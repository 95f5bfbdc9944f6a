use chrono::Utc;
use serde_json::json;
use validator::Validate;

use hrdesk_auth_types::context::RequestContext;
use hrdesk_core::validation::FieldErrors;
use hrdesk_domain::access::effective_role;
use hrdesk_domain::audit::{AuditAction, AuditTarget};
use hrdesk_domain::pagination::{Page, PageRequest};
use hrdesk_domain::user::{Actor, UserRole};

use crate::domain::repository::{ActivityLogRepository, PasswordHasher, UserRepository};
use crate::domain::types::{NewUser, User, UserChanges};
use crate::error::AdminServiceError;
use crate::usecase::audit::{AuditEvent, AuditTrail};

const MIN_PASSWORD_LEN: usize = 8;

fn parse_role(errors: &mut FieldErrors, role: Option<&str>) -> UserRole {
    match role.map(str::trim).filter(|r| !r.is_empty()) {
        None => UserRole::Hr,
        Some(role) => role.parse().unwrap_or_else(|_| {
            errors.add("role", "must be one of: Admin, HR");
            UserRole::Hr
        }),
    }
}

async fn check_email<R: UserRepository>(
    repo: &R,
    errors: &mut FieldErrors,
    email: &str,
    except: Option<i32>,
) -> Result<(), AdminServiceError> {
    if !errors.contains("email") && repo.email_taken(email, except).await? {
        errors.add("email", "the email has already been taken");
    }
    Ok(())
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, AdminServiceError> {
        self.repo.list(search, page.clamped()).await
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 255, message = "is required and may not exceed 255 characters"))]
    pub name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "may not be greater than 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "does not match the password"))]
    pub password_confirmation: String,
    /// `Admin` or `HR`; absent means HR.
    pub role: Option<String>,
}

pub struct CreateUserUseCase<R: UserRepository, H: PasswordHasher, A: ActivityLogRepository> {
    pub repo: R,
    pub hasher: H,
    pub audit: AuditTrail<A>,
}

impl<R, H, A> CreateUserUseCase<R, H, A>
where
    R: UserRepository,
    H: PasswordHasher,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        actor: Actor,
        mut input: CreateUserInput,
    ) -> Result<User, AdminServiceError> {
        input.name = input.name.trim().to_owned();
        input.email = input.email.trim().to_lowercase();

        let mut errors = input.validate().map(|()| FieldErrors::new()).unwrap_or_else(FieldErrors::from);
        let requested = parse_role(&mut errors, input.role.as_deref());
        check_email(&self.repo, &mut errors, &input.email, None).await?;
        errors.into_result()?;

        let role = effective_role(actor.role, requested);
        let password_hash = self.hasher.hash(&input.password)?;
        let user = self
            .repo
            .create(&NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                role,
                email_verified_at: Some(Utc::now()),
            })
            .await?;

        tracing::info!(id = user.id, role = %user.role, "user created");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::UserCreated)
                    .description(format!("Created user {}", user.name))
                    .target(AuditTarget::User(user.id))
                    .properties(json!({
                        "name": user.name,
                        "email": user.email,
                        "role": user.role,
                    })),
            )
            .await;
        Ok(user)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 255, message = "is required and may not exceed 255 characters"))]
    pub name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "may not be greater than 255 characters")
    )]
    pub email: String,
    pub role: Option<String>,
    /// Blank or absent keeps the current password.
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

pub struct UpdateUserUseCase<R: UserRepository, H: PasswordHasher, A: ActivityLogRepository> {
    pub repo: R,
    pub hasher: H,
    pub audit: AuditTrail<A>,
}

impl<R, H, A> UpdateUserUseCase<R, H, A>
where
    R: UserRepository,
    H: PasswordHasher,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        actor: Actor,
        id: i32,
        mut input: UpdateUserInput,
    ) -> Result<User, AdminServiceError> {
        if actor.user_id == id {
            return Err(AdminServiceError::SelfModificationForbidden);
        }
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;

        input.name = input.name.trim().to_owned();
        input.email = input.email.trim().to_lowercase();

        let mut errors = input.validate().map(|()| FieldErrors::new()).unwrap_or_else(FieldErrors::from);
        let requested = parse_role(&mut errors, input.role.as_deref());
        check_email(&self.repo, &mut errors, &input.email, Some(id)).await?;

        let password = input.password.as_deref().filter(|p| !p.is_empty());
        if let Some(password) = password {
            if password.chars().count() < MIN_PASSWORD_LEN {
                errors.add("password", "must be at least 8 characters");
            }
            if input.password_confirmation.as_deref() != Some(password) {
                errors.add("password_confirmation", "does not match the password");
            }
        }
        errors.into_result()?;

        let password_hash = password.map(|p| self.hasher.hash(p)).transpose()?;
        let user = self
            .repo
            .update(
                id,
                &UserChanges {
                    name: input.name,
                    email: input.email,
                    role: effective_role(actor.role, requested),
                    password_hash,
                },
            )
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;

        tracing::info!(id = user.id, role = %user.role, "user updated");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::UserUpdated)
                    .description(format!("Updated user {}", user.name))
                    .target(AuditTarget::User(user.id))
                    .properties(json!({
                        "name": user.name,
                        "email": user.email,
                        "role": user.role,
                        "password_changed": password.is_some(),
                    })),
            )
            .await;
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository, A: ActivityLogRepository> {
    pub repo: R,
    pub audit: AuditTrail<A>,
}

impl<R: UserRepository, A: ActivityLogRepository> DeleteUserUseCase<R, A> {
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        actor: Actor,
        id: i32,
    ) -> Result<(), AdminServiceError> {
        if actor.user_id == id {
            return Err(AdminServiceError::SelfDeletionForbidden);
        }
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;

        // Logged first: the name is gone once the row is.
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::UserDeleted)
                    .description(format!("Deleted user {}", user.name))
                    .target(AuditTarget::User(user.id))
                    .properties(json!({ "name": user.name })),
            )
            .await;

        if !self.repo.delete(id).await? {
            return Err(AdminServiceError::UserNotFound);
        }
        tracing::info!(id, "user deleted");
        Ok(())
    }
}
