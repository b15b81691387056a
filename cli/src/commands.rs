//! The registry workflows behind each subcommand.
//!
//! Every workflow is open, zero or more calls, close. The first failing step
//! ends the workflow: nothing after it runs, including the logout.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use trackhub_core::{
    Credentials, Error as ApiFailure, RegisterTrackHub, SchemaValidator, ServerEndpoint, Session,
    Transport,
};
use uuid::Uuid;

/// A registry step that failed, named for the diagnostic.
#[derive(Debug, Error)]
#[error("{}", describe(.operation, .error))]
pub struct WorkflowError {
    pub operation: &'static str,
    pub error: ApiFailure,
}

fn describe(operation: &str, error: &ApiFailure) -> String {
    match error {
        ApiFailure::Auth { status, reason, .. } => {
            format!("Couldn't {operation}, reason: {reason} [{status}]")
        }
        ApiFailure::Api { status, body } => format!("Couldn't {operation}, reason: {body} [{status}]"),
        other => format!("Couldn't {operation}: {other}"),
    }
}

fn step<T>(operation: &'static str, result: Result<T, ApiFailure>) -> Result<T, WorkflowError> {
    result.map_err(|error| WorkflowError { operation, error })
}

/// Everything a registry workflow needs besides its own arguments.
pub struct Connection<T: Transport> {
    pub transport: T,
    pub endpoint: ServerEndpoint,
    pub credentials: Credentials,
}

impl<T: Transport> Connection<T> {
    fn open(self) -> Result<Session<T>, WorkflowError> {
        step("login", Session::open(self.transport, &self.endpoint, &self.credentials))
    }
}

fn close<T: Transport>(session: Session<T>, out: &mut impl Write) -> Result<()> {
    step("logout", session.close())?;
    writeln!(out, "Logged out")?;
    Ok(())
}

pub fn login<T: Transport>(conn: Connection<T>, out: &mut impl Write) -> Result<()> {
    let session = conn.open()?;
    writeln!(out, "Logged in [{}]", session.token())?;
    Ok(())
}

pub fn logout<T: Transport>(conn: Connection<T>, out: &mut impl Write) -> Result<()> {
    let session = conn.open()?;
    close(session, out)
}

pub fn list<T: Transport>(conn: Connection<T>, out: &mut impl Write) -> Result<()> {
    let session = conn.open()?;
    let hubs = step("get list of registered trackhubs", session.list_trackhubs())?;
    writeln!(out, "{}", serde_json::to_string_pretty(&hubs)?)?;
    close(session, out)
}

pub fn register<T: Transport>(
    conn: Connection<T>,
    url: &str,
    assemblies: &[(String, String)],
    out: &mut impl Write,
) -> Result<()> {
    let input = assemblies
        .iter()
        .fold(RegisterTrackHub::new(url), |input, (name, accession)| {
            input.assembly(name.as_str(), accession.as_str())
        });
    let session = conn.open()?;
    let hub = step("register trackhub", session.register_trackhub(&input))?;
    writeln!(out, "I have registered hub at {} [{}]", hub.url, hub.id)?;
    close(session, out)
}

pub fn show<T: Transport>(conn: Connection<T>, id: Uuid, out: &mut impl Write) -> Result<()> {
    let session = conn.open()?;
    let hub = step("get trackhub", session.get_trackhub(id))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&hub)?)?;
    close(session, out)
}

pub fn delete<T: Transport>(conn: Connection<T>, id: Uuid, out: &mut impl Write) -> Result<()> {
    let session = conn.open()?;
    step("delete trackhub", session.delete_trackhub(id))?;
    writeln!(out, "Deleted trackhub {id}")?;
    close(session, out)
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("couldn't read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Print every violation of `schema` by `file`. Returns whether the file is valid.
pub fn validate(
    validator: &impl SchemaValidator,
    schema: &Path,
    file: &Path,
    out: &mut impl Write,
) -> Result<bool> {
    let schema = read_json(schema)?;
    let instance = read_json(file)?;
    let errors = validator.validate(&schema, &instance)?;
    for error in &errors {
        let path = if error.path.is_empty() { "/" } else { error.path.as_str() };
        writeln!(out, "{path}: {}", error.message)?;
    }
    Ok(errors.is_empty())
}

#[cfg(test)]
mod tests {
    use trackhub_core::AuthOperation;

    use super::*;

    #[test]
    fn diagnostic_names_operation_reason_and_status() {
        let err = WorkflowError {
            operation: "get list of registered trackhubs",
            error: ApiFailure::Api {
                status: 401,
                body: "Invalid or expired auth token".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Couldn't get list of registered trackhubs, reason: Invalid or expired auth token [401]"
        );
    }

    #[test]
    fn login_diagnostic_uses_server_reason() {
        let err = WorkflowError {
            operation: "login",
            error: ApiFailure::Auth {
                operation: AuthOperation::Login,
                status: 401,
                reason: "Invalid username or password".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Couldn't login, reason: Invalid username or password [401]"
        );
    }

    #[test]
    fn network_diagnostic_has_no_status() {
        let err = WorkflowError {
            operation: "login",
            error: ApiFailure::Network("connection refused".to_string()),
        };
        assert_eq!(err.to_string(), "Couldn't login: network error: connection refused");
    }
}
