//! Calls into the security package used for role elevation.
//!
//! Seeds and passwords are bound as parameters and never logged.

use sqlx::PgConnection;

use crate::models::security::VerificationRow;

pub struct SecurityRepo;

impl SecurityRepo {
    /// Call the verification routine. The protocol version is always NULL.
    pub async fn verify_password(
        conn: &mut PgConnection,
        job: &str,
        password: Option<&str>,
    ) -> Result<VerificationRow, sqlx::Error> {
        sqlx::query_as::<_, VerificationRow>(
            "SELECT p_password, p_role \
             FROM bansecr.g_verify_password1_prd($1, $2, $3)",
        )
        .bind(job)
        .bind(Option::<String>::None)
        .bind(password)
        .fetch_one(conn)
        .await
    }

    /// Decrypt a payload with one of the instance seeds.
    pub async fn decrypt(
        conn: &mut PgConnection,
        payload: &str,
        seed: i64,
    ) -> Result<String, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT g_security.g_decrypt_fnc($1, $2)")
            .bind(payload)
            .bind(seed)
            .fetch_one(conn)
            .await
    }

    /// Enable `role` for the rest of the session.
    pub async fn set_role(
        conn: &mut PgConnection,
        role: &str,
        password: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("CALL bansecr.g_set_role($1, $2)")
            .bind(role)
            .bind(password)
            .execute(conn)
            .await?;
        Ok(())
    }
}
