use crate::db::DbPool;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

/// A freshly issued login token. Only its hash is stored.
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn create_session(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    lifetime_days: i64,
) -> Result<IssuedSession, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(lifetime_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(IssuedSession { token, expires_at })
}

pub fn delete_session(conn: &mut PgConnection, token: &str) -> Result<usize, diesel::result::Error> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}

pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Option<User> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .filter(users::deleted_at.is_null())
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}
