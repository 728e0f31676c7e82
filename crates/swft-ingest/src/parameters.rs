//! Catalog control parameters and per-project values.

use serde_json::Value;
use swft_core::constants::{DEFAULT_REQUIREMENT_OWNERSHIP, DEFAULT_REQUIREMENT_STATUS};
use swft_core::errors::{FormatError, IngestError};
use swft_core::json::{first_str, get_array, get_str};
use swft_core::models::{ControlParameter, ProjectRecord};
use swft_storage::queries::{catalog, parameters};
use swft_storage::DatabaseManager;

const MISSING_CONTROL_HINT: &str = ". Import the catalog first.";

/// Normalize one entry of a control's `params[]`.
pub fn normalize_parameter(control_id: &str, data: &Value) -> Result<ControlParameter, FormatError> {
    let param_id = first_str(data, &["id", "param-id"]).ok_or_else(|| FormatError::InvalidParameter {
        control_id: control_id.to_string(),
        message: "parameter has no id".to_string(),
    })?;
    Ok(ControlParameter {
        control_id: control_id.to_string(),
        param_id: param_id.to_string(),
        label: get_str(data, &["label"]).map(String::from),
        description: first_str(data, &["description", "guidance"]).map(String::from),
        values: get_array(data, &["values"])
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        current_value: None,
    })
}

pub struct ParameterStore<'a> {
    db: &'a DatabaseManager,
}

impl<'a> ParameterStore<'a> {
    pub fn new(db: &'a DatabaseManager) -> Self {
        Self { db }
    }

    /// The control's parameters, with `project`'s values attached when given.
    pub fn list_parameters(
        &self,
        control_id: &str,
        project: Option<&ProjectRecord>,
    ) -> Result<Vec<ControlParameter>, IngestError> {
        self.db.with_reader(|conn| {
            let mut params = load_parameters(conn, control_id)?;
            if let Some(project) = project {
                if !params.is_empty() {
                    let values = parameters::values_for_control(conn, project.id, control_id)?;
                    for param in &mut params {
                        param.current_value = values.get(&param.param_id).cloned();
                    }
                }
            }
            Ok(params)
        })
    }

    /// Store `value` for the project and ensure an implemented-requirement
    /// placeholder exists for the control.
    pub fn set_parameter(
        &self,
        project: &ProjectRecord,
        control_id: &str,
        param_id: &str,
        value: &str,
    ) -> Result<ControlParameter, IngestError> {
        self.db.with_transaction(|tx| {
            let mut param = load_parameters(tx, control_id)?
                .into_iter()
                .find(|p| p.param_id == param_id)
                .ok_or_else(|| {
                    IngestError::not_found("parameter", format!("{control_id}/{param_id}"))
                })?;

            parameters::upsert_value(tx, project.id, control_id, param_id, value)?;
            parameters::ensure_implemented_requirement(
                tx,
                project.id,
                control_id,
                DEFAULT_REQUIREMENT_OWNERSHIP,
                DEFAULT_REQUIREMENT_STATUS,
            )?;

            tracing::debug!(
                project = %project.key,
                control_id,
                param_id,
                "set control parameter"
            );
            param.current_value = Some(value.to_string());
            Ok(param)
        })
    }
}

fn load_parameters(
    conn: &rusqlite::Connection,
    control_id: &str,
) -> Result<Vec<ControlParameter>, IngestError> {
    let control = catalog::get_control(conn, control_id)?.ok_or_else(|| {
        IngestError::not_found_with_hint("control", control_id, MISSING_CONTROL_HINT)
    })?;
    control
        .parameters
        .iter()
        .map(|data| normalize_parameter(control_id, data).map_err(IngestError::from))
        .collect()
}
