//! Invocation input validation
//!
//! Everything here runs before any remote call; failures abort the invocation.

use anyhow::{anyhow, bail, Result};
use label_state_core::{Operation, Request, StateError};

/// Raw invocation inputs as received from flags or environment
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub operation: Option<String>,
    pub issue_number: Option<String>,
    pub repository: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
}

/// A validated invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub request: Request,
}

pub fn validate(inputs: &RawInputs) -> Result<Invocation> {
    let operation = parse_operation(inputs.operation.as_deref())?;
    let issue_number = parse_issue_number(inputs.issue_number.as_deref().unwrap_or_default())?;

    let repository = inputs
        .repository
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| anyhow!("Repository is required. Set --repository or GITHUB_REPOSITORY"))?;
    let (owner, repo) = parse_repository(repository)?;

    let key = if operation.requires_key() {
        Some(require_key(inputs.key.as_deref(), operation)?)
    } else {
        None
    };

    let request = match (operation, key) {
        (Operation::Set, Some(key)) => {
            let value = inputs
                .value
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("Value is required for set operation"))?;
            Request::Set {
                key,
                value: value.to_string(),
            }
        }
        (Operation::Get, Some(key)) => Request::Get { key },
        (Operation::Remove, Some(key)) => Request::Remove { key },
        (Operation::GetAll, _) => Request::GetAll,
        (op, None) => bail!("Key is required for {} operation", op),
    };

    Ok(Invocation {
        owner: owner.to_string(),
        repo: repo.to_string(),
        issue_number,
        request,
    })
}

fn parse_operation(raw: Option<&str>) -> Result<Operation> {
    let Some(raw) = raw.map(str::trim).filter(|op| !op.is_empty()) else {
        bail!("Operation is required. Must be one of: set, get, get-all, remove");
    };

    raw.parse::<Operation>().map_err(|e| match e {
        StateError::InvalidInput(message) => anyhow!(message),
        other => anyhow!(other),
    })
}

fn require_key(key: Option<&str>, operation: Operation) -> Result<String> {
    match key {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(anyhow!("Key is required for {} operation", operation)),
    }
}

fn parse_issue_number(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    match trimmed.parse::<u64>() {
        Ok(n) if n > 0 && trimmed.chars().all(|c| c.is_ascii_digit()) => Ok(n),
        _ => Err(anyhow!(
            "Invalid issue number: '{}'. Must be a positive integer",
            raw
        )),
    }
}

/// Split `owner/repo`, both parts non-empty
fn parse_repository(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(anyhow!(
            "Invalid repository format: '{}'. Expected owner/repo",
            raw
        )),
    }
}
