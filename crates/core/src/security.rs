//! Role elevation handshake.
//!
//! A job runs under a database role whose password is never stored in
//! clear. The verification routine hands out the password encrypted twice,
//! once per seed, over two rounds:
//!
//! 1. `verify(job, NULL)` returns either the `INSECURED` sentinel (no role
//!    needed) or a challenge encrypted with seed three.
//! 2. `verify(job, decrypt(challenge, seed_three))` returns the role name
//!    and the role password encrypted with seed one.
//! 3. `set_role(role, decrypt(payload, seed_one))`.
//!
//! Challenges are one-shot, so nothing is retried.

use std::fmt;

use crate::error::CoreError;
use crate::session::SecurityGateway;

/// Status returned by the first verification round when the job needs no role.
pub const INSECURED: &str = "INSECURED";

/// The two decryption seeds configured for a database instance.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RoleSeeds {
    seed_one: i64,
    seed_three: i64,
}

impl RoleSeeds {
    pub fn new(seed_one: i64, seed_three: i64) -> Self {
        Self {
            seed_one,
            seed_three,
        }
    }

    /// Both seeds must be configured; a missing one is reported by key name.
    pub fn from_options(seed_one: Option<i64>, seed_three: Option<i64>) -> Result<Self, CoreError> {
        let seed_one = seed_one.ok_or(CoreError::Configuration("seed_one"))?;
        let seed_three = seed_three.ok_or(CoreError::Configuration("seed_three"))?;
        Ok(Self::new(seed_one, seed_three))
    }

    pub fn seed_one(&self) -> i64 {
        self.seed_one
    }

    pub fn seed_three(&self) -> i64 {
        self.seed_three
    }
}

impl fmt::Debug for RoleSeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RoleSeeds(<redacted>)")
    }
}

/// Output parameters of one verification round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// Encrypted payload, or the [`INSECURED`] status.
    pub password: Option<String>,
    /// Role name. Only meaningful in the second round.
    pub role: Option<String>,
}

/// A role and its one-time password, valid for the current session only.
#[derive(Clone, PartialEq, Eq)]
pub struct ElevatedRole {
    role: String,
    password: String,
}

impl ElevatedRole {
    pub fn new(role: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            password: password.into(),
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ElevatedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevatedRole")
            .field("role", &self.role)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a successful elevation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Elevation {
    /// The verification routine reported the job as `INSECURED`.
    NotRequired,
    /// The session now runs under `role`.
    Elevated { role: String },
}

/// Runs the two-round handshake against a session.
#[derive(Debug, Clone, Copy)]
pub struct RoleElevator {
    seeds: RoleSeeds,
}

impl RoleElevator {
    pub fn new(seeds: RoleSeeds) -> Self {
        Self { seeds }
    }

    /// Elevate `session` to the role authorized to run `job`.
    ///
    /// The role set is irreversible for the lifetime of the session.
    pub async fn elevate<S: SecurityGateway>(
        &self,
        session: &mut S,
        job: &str,
    ) -> Result<Elevation, CoreError> {
        let first = session.verify_password(job, None).await?;
        let challenge = match first.password {
            Some(status) if status == INSECURED => {
                tracing::info!(job, "Job is not secured, no role elevation required");
                return Ok(Elevation::NotRequired);
            }
            Some(challenge) if !challenge.is_empty() => challenge,
            _ => return Err(CoreError::protocol(job, "first verification returned no payload")),
        };

        let first_password = session.decrypt(&challenge, self.seeds.seed_three).await?;
        let second = session.verify_password(job, Some(&first_password)).await?;

        let payload = match second.password {
            Some(status) if status == INSECURED => {
                return Err(CoreError::protocol(
                    job,
                    "second verification unexpectedly reported INSECURED",
                ))
            }
            Some(payload) if !payload.is_empty() => payload,
            _ => return Err(CoreError::protocol(job, "second verification returned no payload")),
        };
        let role = second
            .role
            .filter(|role| !role.is_empty())
            .ok_or_else(|| CoreError::protocol(job, "second verification returned no role"))?;

        let password = session.decrypt(&payload, self.seeds.seed_one).await?;
        let elevated = ElevatedRole::new(role, password);
        session.set_role(&elevated).await?;

        tracing::info!(job, role = elevated.role(), "Session role elevated");
        Ok(Elevation::Elevated {
            role: elevated.role,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
