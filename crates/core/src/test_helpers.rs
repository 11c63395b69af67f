//! Shared test helpers: an in-memory session that records every call.

use std::collections::{HashMap, VecDeque};

use crate::error::CoreError;
use crate::parameters::{Cardinality, ParameterDefinition, RunArchiveEntry};
use crate::security::{ElevatedRole, Verification};
use crate::session::{JobCatalog, ParameterStore, SecurityGateway};
use crate::types::OneUpNo;

/// Build declared parameter names from string literals.
pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Build definitions numbered from 1 with the given cardinalities.
pub fn definitions(cardinalities: &[Cardinality]) -> Vec<ParameterDefinition> {
    cardinalities
        .iter()
        .zip(1..)
        .map(|(cardinality, number)| ParameterDefinition {
            number,
            cardinality: *cardinality,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Verify { job: String, password: Option<String> },
    Decrypt { payload: String, seed: i64 },
    SetRole { role: String },
    Definitions { job: String },
    Archive { job: String, one_up: OneUpNo },
    DeleteArchive { job: String, one_up: OneUpNo },
    Title { job: String },
    Institution,
}

/// Scripted session. Decryption is `"{payload}|{seed}"` so tests can see
/// which seed produced which password.
#[derive(Debug, Default)]
pub struct FakeSession {
    verifications: VecDeque<Verification>,
    decrypt_fails: bool,
    definitions: Vec<ParameterDefinition>,
    archive: HashMap<(String, OneUpNo), Vec<RunArchiveEntry>>,
    pub calls: Vec<SessionCall>,
    pub roles_set: Vec<ElevatedRole>,
}

impl FakeSession {
    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verifications.push_back(verification);
        self
    }

    pub fn failing_decrypt(mut self) -> Self {
        self.decrypt_fails = true;
        self
    }

    pub fn with_definitions(mut self, cardinalities: &[Cardinality]) -> Self {
        self.definitions = definitions(cardinalities);
        self
    }

    pub fn with_archive(mut self, job: &str, one_up: OneUpNo, rows: Vec<RunArchiveEntry>) -> Self {
        self.archive.insert((job.to_string(), one_up), rows);
        self
    }

    pub fn archive_rows(&self, job: &str, one_up: OneUpNo) -> Vec<RunArchiveEntry> {
        self.archive
            .get(&(job.to_string(), one_up))
            .cloned()
            .unwrap_or_default()
    }
}

impl SecurityGateway for FakeSession {
    async fn verify_password(
        &mut self,
        job: &str,
        password: Option<&str>,
    ) -> Result<Verification, CoreError> {
        self.calls.push(SessionCall::Verify {
            job: job.to_string(),
            password: password.map(str::to_string),
        });
        self.verifications
            .pop_front()
            .ok_or_else(|| CoreError::Database("no scripted verification left".into()))
    }

    async fn decrypt(&mut self, payload: &str, seed: i64) -> Result<String, CoreError> {
        self.calls.push(SessionCall::Decrypt {
            payload: payload.to_string(),
            seed,
        });
        if self.decrypt_fails {
            return Err(CoreError::Database("decrypt failed".into()));
        }
        Ok(format!("{payload}|{seed}"))
    }

    async fn set_role(&mut self, role: &ElevatedRole) -> Result<(), CoreError> {
        self.calls.push(SessionCall::SetRole {
            role: role.role().to_string(),
        });
        self.roles_set.push(role.clone());
        Ok(())
    }
}

impl ParameterStore for FakeSession {
    async fn parameter_definitions(
        &mut self,
        job: &str,
    ) -> Result<Vec<ParameterDefinition>, CoreError> {
        self.calls.push(SessionCall::Definitions {
            job: job.to_string(),
        });
        Ok(self.definitions.clone())
    }

    async fn archived_values(
        &mut self,
        job: &str,
        one_up: OneUpNo,
    ) -> Result<Vec<RunArchiveEntry>, CoreError> {
        self.calls.push(SessionCall::Archive {
            job: job.to_string(),
            one_up,
        });
        Ok(self.archive_rows(job, one_up))
    }

    async fn delete_archived_values(&mut self, job: &str, one_up: OneUpNo) -> Result<u64, CoreError> {
        self.calls.push(SessionCall::DeleteArchive {
            job: job.to_string(),
            one_up,
        });
        Ok(self
            .archive
            .remove(&(job.to_string(), one_up))
            .map(|rows| rows.len() as u64)
            .unwrap_or(0))
    }
}

impl JobCatalog for FakeSession {
    async fn job_title(&mut self, job: &str) -> Result<String, CoreError> {
        self.calls.push(SessionCall::Title {
            job: job.to_string(),
        });
        Ok(format!("{job} Title"))
    }

    async fn institution_name(&mut self) -> Result<String, CoreError> {
        self.calls.push(SessionCall::Institution);
        Ok("Example University".to_string())
    }
}
