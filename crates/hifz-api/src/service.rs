//! Account rules: registration and sign-in. Blocking; call through
//! `run_blocking` from async handlers.

use tracing::{info, warn};
use uuid::Uuid;

use hifz_db::models::NewUser;
use hifz_db::{Database, DbError};
use hifz_types::api::RegisterRequest;
use hifz_types::models::Account;

use crate::convert::account_from_row;
use crate::error::ApiError;
use crate::password::{hash_password, verify_password};
use crate::token::TokenAuthority;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;
const PASSWORD_MIN: usize = 8;

pub struct AccountService<'a> {
    db: &'a Database,
    tokens: &'a TokenAuthority,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a Database, tokens: &'a TokenAuthority) -> Self {
        Self { db, tokens }
    }

    pub fn register(&self, req: RegisterRequest) -> Result<Account, ApiError> {
        validate_username(&req.username)?;
        if req.password.chars().count() < PASSWORD_MIN {
            return Err(ApiError::Validation(format!(
                "password must be at least {} characters",
                PASSWORD_MIN
            )));
        }

        if self.db.get_user_by_username(&req.username)?.is_some() {
            return Err(already_registered());
        }

        let password_hash = hash_password(&req.password)
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?;
        let user_id = Uuid::new_v4().to_string();

        // A concurrent registration can still win between the lookup and here
        self.db
            .create_user(&NewUser {
                id: &user_id,
                username: &req.username,
                password_hash: &password_hash,
                fullname: &req.fullname,
                description: &req.description,
                profile_pic: &req.profile_pic,
            })
            .map_err(|e| match e {
                DbError::ConstraintViolation(_) => already_registered(),
                other => other.into(),
            })?;

        info!("Registered user {}", req.username);

        let row = self
            .db
            .get_user_by_username(&req.username)?
            .ok_or_else(|| ApiError::Internal(format!("user {} missing after insert", user_id)))?;
        account_from_row(row)
    }

    /// Check credentials and issue a bearer token.
    pub fn login(&self, username: &str, password: &str) -> Result<(Account, String), ApiError> {
        let Some(user) = self.db.get_user_by_username(username)? else {
            warn!("Sign-in for unknown user {}", username);
            return Err(ApiError::InvalidCredentials);
        };

        let matches = verify_password(password, &user.password)
            .map_err(|e| ApiError::Internal(format!("stored hash for {} unusable: {}", username, e)))?;
        if !matches {
            warn!("Wrong password for {}", username);
            return Err(ApiError::InvalidCredentials);
        }

        let account = account_from_row(user)?;
        let token = self.tokens.issue(account.id, &account.username)?;

        info!("User {} signed in", account.username);
        Ok((account, token))
    }
}

fn already_registered() -> ApiError {
    ApiError::Conflict("username already registered".into())
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ApiError::Validation(format!(
            "username must be {}-{} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ApiError::Validation("username must not contain whitespace".into()));
    }
    Ok(())
}
