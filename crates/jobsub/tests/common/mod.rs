//! Scripted in-memory session shared by the bootstrap tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use jobsub_core::config::{ConfigLayer, ConfigResolver, JobsubConfig};
use jobsub_core::error::CoreError;
use jobsub_core::parameters::{Cardinality, ParameterDefinition, RunArchiveEntry};
use jobsub_core::security::{ElevatedRole, Verification};
use jobsub_core::session::{JobCatalog, ParameterStore, SecurityGateway};
use jobsub_core::types::OneUpNo;

#[derive(Debug, Default)]
pub struct ScriptedSession {
    verifications: VecDeque<Verification>,
    definitions: Vec<ParameterDefinition>,
    archive: HashMap<OneUpNo, Vec<RunArchiveEntry>>,
    pub roles_set: Vec<ElevatedRole>,
    pub institution_lookups: usize,
}

impl ScriptedSession {
    /// A job the verification routine reports as not secured.
    pub fn insecured() -> Self {
        Self::default().verification(Some("INSECURED"), None)
    }

    /// A secured job completing both handshake rounds.
    pub fn secured(role: &str) -> Self {
        Self::default()
            .verification(Some("challenge"), None)
            .verification(Some("payload"), Some(role))
    }

    pub fn verification(mut self, password: Option<&str>, role: Option<&str>) -> Self {
        self.verifications.push_back(Verification {
            password: password.map(str::to_string),
            role: role.map(str::to_string),
        });
        self
    }

    pub fn definitions(mut self, cardinalities: &[Cardinality]) -> Self {
        self.definitions = cardinalities
            .iter()
            .zip(1..)
            .map(|(cardinality, number)| ParameterDefinition {
                number,
                cardinality: *cardinality,
            })
            .collect();
        self
    }

    pub fn archive(mut self, one_up: OneUpNo, rows: &[(i32, &str)]) -> Self {
        let rows = rows
            .iter()
            .map(|(number, value)| RunArchiveEntry::new(*number, *value))
            .collect();
        self.archive.insert(one_up, rows);
        self
    }

    pub fn archived(&self, one_up: OneUpNo) -> usize {
        self.archive.get(&one_up).map_or(0, Vec::len)
    }
}

impl SecurityGateway for ScriptedSession {
    async fn verify_password(
        &mut self,
        _job: &str,
        _password: Option<&str>,
    ) -> Result<Verification, CoreError> {
        self.verifications
            .pop_front()
            .ok_or_else(|| CoreError::Database("verification not scripted".into()))
    }

    async fn decrypt(&mut self, payload: &str, seed: i64) -> Result<String, CoreError> {
        Ok(format!("{payload}:{seed}"))
    }

    async fn set_role(&mut self, role: &ElevatedRole) -> Result<(), CoreError> {
        self.roles_set.push(role.clone());
        Ok(())
    }
}

impl ParameterStore for ScriptedSession {
    async fn parameter_definitions(
        &mut self,
        _job: &str,
    ) -> Result<Vec<ParameterDefinition>, CoreError> {
        Ok(self.definitions.clone())
    }

    async fn archived_values(
        &mut self,
        _job: &str,
        one_up: OneUpNo,
    ) -> Result<Vec<RunArchiveEntry>, CoreError> {
        Ok(self.archive.get(&one_up).cloned().unwrap_or_default())
    }

    async fn delete_archived_values(&mut self, _job: &str, one_up: OneUpNo) -> Result<u64, CoreError> {
        Ok(self.archive.remove(&one_up).map_or(0, |rows| rows.len() as u64))
    }
}

impl JobCatalog for ScriptedSession {
    async fn job_title(&mut self, job: &str) -> Result<String, CoreError> {
        Ok(format!("{job} Population Report"))
    }

    async fn institution_name(&mut self) -> Result<String, CoreError> {
        self.institution_lookups += 1;
        Ok("Example State University".into())
    }
}

/// Configuration with fixed credentials and seeds, plus `overrides`.
pub fn config(overrides: ConfigLayer) -> JobsubConfig {
    let defaults = ConfigLayer::defaults(
        Some("batch".into()),
        Some("secret".into()),
        Some("localhost/banner".into()),
    );
    let seeds = ConfigLayer {
        seed_one: Some(11),
        seed_three: Some(33),
        ..ConfigLayer::default()
    };
    ConfigResolver::new(defaults.merge(seeds))
        .resolve(overrides)
        .expect("test configuration resolves")
}
