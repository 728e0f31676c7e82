//! Trivy vulnerability report parser.

use std::path::Path;

use swft_core::errors::{FormatError, IngestError};
use swft_core::json::{self, first_str, get_array, get_str};
use swft_core::models::TrivyFinding;

use super::{read_source, require_object};

pub fn load_trivy_report(path: &Path) -> Result<Vec<TrivyFinding>, IngestError> {
    Ok(parse_trivy_report(&read_source(path)?)?)
}

/// Flattens `Results[].Vulnerabilities[]`. Each finding carries its result's
/// `Target` as the artifact.
pub fn parse_trivy_report(bytes: &[u8]) -> Result<Vec<TrivyFinding>, FormatError> {
    let data = json::parse_bytes(bytes)?;
    require_object(&data, "Trivy report")?;

    let mut findings = Vec::new();
    for result in get_array(&data, &["Results"]) {
        let target = get_str(result, &["Target"]);
        for vuln in get_array(result, &["Vulnerabilities"]) {
            findings.push(TrivyFinding {
                cve_id: get_str(vuln, &["VulnerabilityID"]).unwrap_or_default().to_string(),
                severity: get_str(vuln, &["Severity"]).unwrap_or_default().to_string(),
                pkg: get_str(vuln, &["PkgName"]).map(String::from),
                installed_version: get_str(vuln, &["InstalledVersion"]).map(String::from),
                fixed_version: get_str(vuln, &["FixedVersion"]).map(String::from),
                artifact: target.map(String::from),
                path: first_str(vuln, &["PkgPath", "PrimaryURL"]).map(String::from),
            });
        }
    }
    Ok(findings)
}
