use time::OffsetDateTime;

/// A persisted user row. The password is only ever held as an Argon2 hash.
#[derive(Clone, Debug)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: Option<OffsetDateTime>,
}
