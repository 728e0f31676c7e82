//! Azure Policy state snapshot import.
//!
//! Observations are not versioned. Each entry is fanned out to the controls
//! its definition maps to within the initiative; entries with no mapped
//! control are skipped.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use swft_core::errors::IngestError;
use swft_core::models::PolicyScope;
use swft_storage::queries::policies::{self, PolicyStateRow};
use swft_storage::DatabaseManager;

use super::require_name;
use crate::parsers::load_policy_states;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyStateImportResult {
    /// Entries parsed from the snapshot.
    pub processed: usize,
    /// `policy_states` rows written, one per (entry, mapped control).
    pub inserted: usize,
}

pub struct PolicyStateImporter<'a> {
    db: &'a DatabaseManager,
}

impl<'a> PolicyStateImporter<'a> {
    pub fn new(db: &'a DatabaseManager) -> Self {
        Self { db }
    }

    pub fn ingest(
        &self,
        path: &Path,
        initiative_name: &str,
        scope: PolicyScope,
    ) -> Result<PolicyStateImportResult, IngestError> {
        let initiative_name = require_name("initiative", initiative_name)?;
        let states = load_policy_states(path)?;

        let inserted = self.db.with_transaction(|tx| {
            let initiative_fk = policies::find_initiative(tx, initiative_name, scope.as_str())?
                .ok_or_else(|| {
                    IngestError::not_found_with_hint(
                        "initiative",
                        format!("{initiative_name} ({scope})"),
                        ". Import the policy definitions first.",
                    )
                })?;

            let mut inserted = 0;
            for state in &states {
                let control_ids =
                    policies::controls_for_policy(tx, initiative_fk, &state.policy_definition_id)?;
                if control_ids.is_empty() {
                    tracing::debug!(
                        policy_definition_id = %state.policy_definition_id,
                        "skipping state with no mapped control"
                    );
                    continue;
                }
                let last_evaluated = normalize_timestamp(&state.last_evaluated);
                for control_id in control_ids {
                    policies::replace_state(
                        tx,
                        initiative_fk,
                        &PolicyStateRow {
                            control_id,
                            policy_definition_id: state.policy_definition_id.clone(),
                            assignment_id: state.policy_assignment_id.clone(),
                            resource_id: state.resource_id.clone(),
                            compliance_state: state.compliance_state.clone(),
                            last_evaluated: last_evaluated.clone(),
                        },
                    )?;
                    inserted += 1;
                }
            }
            Ok::<_, IngestError>(inserted)
        })?;

        tracing::info!(
            kind = "policy_state",
            initiative = initiative_name,
            scope = %scope,
            processed = states.len(),
            inserted,
            "imported policy states"
        );

        Ok(PolicyStateImportResult {
            processed: states.len(),
            inserted,
        })
    }
}

/// RFC 3339 in UTC. A timestamp without an offset is read as UTC; anything
/// unparsable is replaced by the current time.
pub fn normalize_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::AutoSi, true);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true);
    }
    tracing::warn!(timestamp = raw, "unparsable policy state timestamp, using now");
    Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
