use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::storage::user_repo::UserRepository;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

#[derive(Clone, Debug)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Registers a new user. Any client-supplied id is ignored; the store
    /// assigns the surrogate key.
    #[tracing::instrument(
        skip(self, username, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn register_user(&self, username: String, password: String) -> Result<User> {
        if self.user_repo.username_exists(&username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = hash_password(&password).await?;
        let user = self.user_repo.create(&username, &password_hash).await?;

        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        tracing::info!("User registered");

        Ok(user)
    }

    /// Full replace of username and password for an existing user.
    #[tracing::instrument(skip(self, username, password), err(level = "warn"))]
    pub async fn update_user(&self, id: i64, username: String, password: String) -> Result<User> {
        // A clash against a different row still surfaces as Conflict through
        // the unique index; this pre-check only catches the common case.
        if let Some(existing) = self.user_repo.find_by_username(&username).await? {
            if existing.id != id {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
        }

        let password_hash = hash_password(&password).await?;
        let user = self.user_repo.update(id, &username, &password_hash).await?.ok_or(AppError::NotFound)?;

        tracing::info!("User updated");

        Ok(user)
    }

    /// Deleting an absent id is an error, consistently with the single-entity
    /// lookups.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let rows = self.user_repo.delete_by_id(id).await?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        tracing::info!("User deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn get_users_by_username(&self, prefix: &str) -> Result<Vec<User>> {
        let users = self.user_repo.find_by_username_prefix(prefix).await?;
        if users.is_empty() {
            return Err(AppError::NotFound);
        }

        Ok(users)
    }

    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn get_user_by_id(&self, id: i64) -> Result<User> {
        self.user_repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn username_already_exists(&self, username: &str) -> Result<bool> {
        self.user_repo.username_exists(username).await
    }

    /// True iff a user with that username exists and the password matches its
    /// stored hash. Unknown usernames verify as false, not as an error.
    #[tracing::instrument(skip(self, username, password), err(level = "warn"))]
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<bool> {
        let Some(user) = self.user_repo.find_by_username(username).await? else {
            return Ok(false);
        };

        verify_password(password, &user.password_hash).await
    }
}

async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)
            .map(|h| h.to_string())
    })
    .await
    .map_err(|_| AppError::Internal)?
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash).map_err(|_| AppError::Internal)?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
    })
    .await
    .map_err(|_| AppError::Internal)?
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[tokio::test]
    async fn hash_round_trips_and_rejects_wrong_password() {
        let hash = hash_password("Passw0rd").await.unwrap();
        assert_ne!(hash, "Passw0rd");
        assert!(verify_password("Passw0rd", &hash).await.unwrap());
        assert!(!verify_password("passw0rd", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let a = hash_password("Passw0rd").await.unwrap();
        let b = hash_password("Passw0rd").await.unwrap();
        assert_ne!(a, b);
    }
}
