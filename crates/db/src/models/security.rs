//! Output parameters of the security routines.

use jobsub_core::security::Verification;
use sqlx::FromRow;

/// OUT parameters of `bansecr.g_verify_password1_prd`.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationRow {
    pub p_password: Option<String>,
    pub p_role: Option<String>,
}

impl From<VerificationRow> for Verification {
    fn from(row: VerificationRow) -> Self {
        Verification {
            password: row.p_password,
            role: row.p_role,
        }
    }
}
