//! Accounts, password hashing and cookie sessions.

pub mod extract;
pub mod password;
pub mod session;

pub use extract::{StaffUser, Viewer};
pub use session::{RedisSessionStore, SessionStore};

use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::NewUser;

/// Creates the configured staff account if it does not exist yet.
pub async fn ensure_admin(state: &AppState) -> Result<(), AppError> {
    let (Some(username), Some(password)) = (
        state.config.admin_username.clone(),
        state.config.admin_password.clone(),
    ) else {
        return Ok(());
    };

    if state.accounts.username_taken(&username).await? {
        info!("Admin account '{username}' already present");
        return Ok(());
    }

    let password_hash = password::hash_password_blocking(password).await?;
    state
        .accounts
        .create_user(NewUser {
            username: username.clone(),
            email: String::new(),
            password_hash,
            is_staff: true,
        })
        .await?;
    info!("Created admin account '{username}'");
    Ok(())
}
