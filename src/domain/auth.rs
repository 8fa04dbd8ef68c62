//! Authentication and account management

use crate::contract::{Account, AuthContext, NewAccount, PortalError, Role};
use crate::domain::repository::AccountRepository;
use crate::domain::validation;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Self-registration request
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub department: String,
}

/// Role login request
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    /// Required when logging in as a lecturer
    pub lecturer_id: Option<String>,
}

/// Request to create a lecturer account (admin action)
#[derive(Debug, Clone)]
pub struct NewLecturer {
    pub username: String,
    pub email: String,
    pub lecturer_id: String,
    pub password: String,
    pub department: Option<String>,
}

/// Request to create a student account (admin action)
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub username: String,
    pub email: String,
    pub password: String,
    pub department: String,
}

/// JWT claims carried by session tokens
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    sub: i64,
    role: String,
    exp: u64,
}

/// HS256 session token signer/verifier
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn issue(&self, user_id: i64, role: Role) -> Result<String, PortalError> {
        let exp = chrono::Utc::now().timestamp() as u64 + self.ttl_secs;
        let claims = Claims {
            sub: user_id,
            role: role.as_str().to_string(),
            exp,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding).map_err(|err| {
            tracing::error!(error = %err, "failed to sign session token");
            PortalError::Internal
        })
    }

    pub fn verify(&self, token: &str) -> Result<AuthContext, PortalError> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
                .map_err(|_| PortalError::unauthorized("invalid or expired token"))?;
        let role = Role::parse(&data.claims.role)
            .ok_or_else(|| PortalError::unauthorized("unknown role in token"))?;
        Ok(AuthContext::new(data.claims.sub, role))
    }
}

/// Account and session service
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    tokens: TokenSigner,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, tokens: TokenSigner) -> Self {
        Self { accounts, tokens }
    }

    /// Verify a session token into a caller context
    pub fn verify_token(&self, token: &str) -> Result<AuthContext, PortalError> {
        self.tokens.verify(token)
    }

    /// Register a new student or lecturer account
    ///
    /// Self-registered accounts start unapproved and are unlocked by an
    /// administrator.
    pub async fn register(&self, req: Registration) -> Result<Account, PortalError> {
        if req.role == Role::Admin {
            return Err(PortalError::validation(
                "admin accounts cannot be self-registered",
            ));
        }
        validation::validate_username(&req.username)?;
        validation::validate_email(&req.email)?;
        validation::validate_password(&req.password)?;
        validation::validate_department(&req.department)?;

        if self
            .accounts
            .username_exists(&req.username)
            .await
            .map_err(internal)?
        {
            return Err(PortalError::conflict(format!(
                "username already exists: {}",
                req.username
            )));
        }

        let account = self
            .accounts
            .create(NewAccount {
                username: req.username,
                email: req.email,
                password_hash: hash_password(&req.password)?,
                role: req.role,
                lecturer_id: None,
                department: Some(req.department),
                is_approved: false,
            })
            .await
            .map_err(internal)?;

        tracing::info!(
            user_id = account.user.id,
            role = %account.profile.role,
            "account registered"
        );
        Ok(account)
    }

    /// Role login: credentials, claimed role and (for lecturers) the staff id
    /// must all match. Returns the session token with the account.
    pub async fn login(&self, req: LoginRequest) -> Result<(String, Account), PortalError> {
        let user = self
            .accounts
            .find_user_by_username(&req.username)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::unauthorized("invalid credentials"))?;

        if !verify_password(&req.password, &user.password_hash) {
            return Err(PortalError::unauthorized("invalid credentials"));
        }

        let profile = self
            .accounts
            .find_profile_by_user(user.id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::unauthorized("profile missing for this user"))?;

        if profile.role != req.role {
            return Err(PortalError::unauthorized("role mismatch"));
        }

        if req.role == Role::Lecturer {
            let supplied = req.lecturer_id.as_deref().map(str::trim).unwrap_or_default();
            match profile.lecturer_id.as_deref() {
                Some(expected) if supplied == expected => {}
                _ => return Err(PortalError::unauthorized("lecturer id mismatch")),
            }
        }

        if req.role == Role::Student && !profile.is_approved {
            return Err(PortalError::NotApproved);
        }

        let token = self.tokens.issue(user.id, profile.role)?;
        Ok((token, Account { user, profile }))
    }

    /// Look up the full account for an authenticated user
    pub async fn account(&self, user_id: i64) -> Result<Account, PortalError> {
        let user = self
            .accounts
            .find_user(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("user", user_id))?;
        let profile = self
            .accounts
            .find_profile_by_user(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("profile", user_id))?;
        Ok(Account { user, profile })
    }

    /// Approve a pending student (admin action)
    pub async fn approve_student(
        &self,
        ctx: &AuthContext,
        user_id: i64,
    ) -> Result<(), PortalError> {
        require_admin(ctx)?;
        let profile = self
            .accounts
            .find_profile_by_user(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("profile", user_id))?;
        if profile.role != Role::Student {
            return Err(PortalError::not_found("student", user_id));
        }
        self.accounts
            .set_approved(user_id, true)
            .await
            .map_err(internal)?;
        tracing::info!(user_id, "student approved");
        Ok(())
    }

    /// Create an approved lecturer account (admin action)
    pub async fn add_lecturer(
        &self,
        ctx: &AuthContext,
        req: NewLecturer,
    ) -> Result<Account, PortalError> {
        require_admin(ctx)?;
        validation::validate_username(&req.username)?;
        validation::validate_email(&req.email)?;
        validation::validate_password(&req.password)?;
        validation::validate_lecturer_id(&req.lecturer_id)?;
        if let Some(department) = &req.department {
            validation::validate_department(department)?;
        }

        if self
            .accounts
            .username_exists(&req.username)
            .await
            .map_err(internal)?
        {
            return Err(PortalError::conflict(format!(
                "username already exists: {}",
                req.username
            )));
        }
        if self
            .accounts
            .lecturer_id_exists(&req.lecturer_id)
            .await
            .map_err(internal)?
        {
            return Err(PortalError::conflict(format!(
                "lecturer id already exists: {}",
                req.lecturer_id
            )));
        }

        let account = self
            .accounts
            .create(NewAccount {
                username: req.username,
                email: req.email,
                password_hash: hash_password(&req.password)?,
                role: Role::Lecturer,
                lecturer_id: Some(req.lecturer_id),
                department: req.department,
                is_approved: true,
            })
            .await
            .map_err(internal)?;

        tracing::info!(user_id = account.user.id, "lecturer added");
        Ok(account)
    }

    /// Create a student account directly, skipping the approval queue
    /// (admin action)
    pub async fn add_student(
        &self,
        ctx: &AuthContext,
        req: NewStudent,
    ) -> Result<Account, PortalError> {
        require_admin(ctx)?;
        validation::validate_username(&req.username)?;
        validation::validate_email(&req.email)?;
        validation::validate_password(&req.password)?;
        validation::validate_department(&req.department)?;

        if self
            .accounts
            .username_exists(&req.username)
            .await
            .map_err(internal)?
        {
            return Err(PortalError::conflict(format!(
                "username already exists: {}",
                req.username
            )));
        }

        let account = self
            .accounts
            .create(NewAccount {
                username: req.username,
                email: req.email,
                password_hash: hash_password(&req.password)?,
                role: Role::Student,
                lecturer_id: None,
                department: Some(req.department),
                is_approved: true,
            })
            .await
            .map_err(internal)?;

        tracing::info!(user_id = account.user.id, "student added");
        Ok(account)
    }

    /// Delete a lecturer account (admin action)
    pub async fn delete_lecturer(
        &self,
        ctx: &AuthContext,
        user_id: i64,
    ) -> Result<(), PortalError> {
        require_admin(ctx)?;
        if ctx.user_id == user_id {
            return Err(PortalError::conflict("cannot delete your own account"));
        }
        let profile = self
            .accounts
            .find_profile_by_user(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("lecturer", user_id))?;
        if profile.role != Role::Lecturer {
            return Err(PortalError::not_found("lecturer", user_id));
        }
        self.accounts.delete_user(user_id).await.map_err(internal)?;
        tracing::info!(user_id, "lecturer deleted");
        Ok(())
    }

    /// Attach an uploaded profile image to the caller's account
    pub async fn set_profile_image(
        &self,
        ctx: &AuthContext,
        path: String,
    ) -> Result<Account, PortalError> {
        self.accounts
            .find_profile_by_user(ctx.user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("profile", ctx.user_id))?;
        self.accounts
            .set_profile_image(ctx.user_id, &path)
            .await
            .map_err(internal)?;
        self.account(ctx.user_id).await
    }

    /// Create the configured administrator account if it does not exist yet.
    /// Called once at startup so a fresh database has a usable admin.
    pub async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), PortalError> {
        if self
            .accounts
            .username_exists(username)
            .await
            .map_err(internal)?
        {
            return Ok(());
        }
        validation::validate_username(username)?;
        validation::validate_email(email)?;
        validation::validate_password(password)?;

        let account = self
            .accounts
            .create(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password)?,
                role: Role::Admin,
                lecturer_id: None,
                department: None,
                is_approved: true,
            })
            .await
            .map_err(internal)?;
        tracing::info!(user_id = account.user.id, "administrator account created");
        Ok(())
    }

    /// List lecturer accounts (admin action)
    pub async fn list_lecturers(&self, ctx: &AuthContext) -> Result<Vec<Account>, PortalError> {
        require_admin(ctx)?;
        self.accounts
            .list_by_role(Role::Lecturer)
            .await
            .map_err(internal)
    }
}

fn require_admin(ctx: &AuthContext) -> Result<(), PortalError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(PortalError::forbidden("administrator role required"))
    }
}

fn hash_password(password: &str) -> Result<String, PortalError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            PortalError::Internal
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn internal(err: anyhow::Error) -> PortalError {
    tracing::error!(error = %err, "repository failure");
    PortalError::Internal
}
