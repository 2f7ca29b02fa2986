//! Task CSV loading and dependency validation.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::model::TaskRecord;

const EXPECTED_COLUMNS: [&str; 7] = [
    "TASK_NAME",
    "TASK_HOST",
    "TASK_INITIAL_SLEEP_TIME",
    "TASK_RUN_TIME",
    "TASK_RAM",
    "TASK_NETWORK_TIME",
    "TASK_DEPENDENCY",
];

/// Reads the task CSV. Columns may appear in any order, but the column set
/// must match exactly; fields are whitespace-trimmed. Row numbers in errors
/// count the header as row 1.
pub fn load_tasks(path: &Path) -> Result<Vec<TaskRecord>> {
    let file = File::open(path)
        .with_context(|| format!("task CSV file not found: {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .with_context(|| format!("CSV file is empty or has no header: {}", path.display()))?
        .clone();
    validate_headers(&headers)?;

    let mut tasks = Vec::new();
    let mut names = HashSet::new();
    for (i, row) in reader.deserialize::<TaskRecord>().enumerate() {
        let row_num = i + 2;
        let record = row.with_context(|| format!("error parsing row {}", row_num))?;
        record
            .validate()
            .with_context(|| format!("error parsing row {}", row_num))?;
        if !names.insert(record.name.clone()) {
            bail!("row {}: duplicate task name '{}'", row_num, record.name);
        }
        tasks.push(record);
    }

    Ok(tasks)
}

fn validate_headers(headers: &StringRecord) -> Result<()> {
    let actual: HashSet<&str> = headers.iter().collect();
    let expected: HashSet<&str> = EXPECTED_COLUMNS.iter().copied().collect();
    if actual == expected {
        return Ok(());
    }

    let mut missing: Vec<_> = expected.difference(&actual).copied().collect();
    let mut extra: Vec<_> = actual.difference(&expected).copied().collect();
    missing.sort();
    extra.sort();

    let mut message = String::from("invalid CSV header.");
    if !missing.is_empty() {
        message.push_str(&format!(" Missing columns: {}.", missing.join(", ")));
    }
    if !extra.is_empty() {
        message.push_str(&format!(" Extra columns: {}.", extra.join(", ")));
    }
    bail!(message);
}

/// Checks that every dependency names a known task and that the dependency
/// graph is acyclic. Each task has at most one predecessor, so a cycle is a
/// loop in the predecessor chain.
pub fn validate_dependencies(tasks: &[TaskRecord]) -> Result<()> {
    let by_name: HashMap<&str, &TaskRecord> =
        tasks.iter().map(|t| (t.name.as_str(), t)).collect();

    for task in tasks {
        if let Some(dep) = &task.dependency {
            if !by_name.contains_key(dep.as_str()) {
                bail!("task '{}' has undefined dependency: '{}'", task.name, dep);
            }
        }
    }

    let mut done: HashSet<&str> = HashSet::new();
    for task in tasks {
        if done.contains(task.name.as_str()) {
            continue;
        }
        let mut chain: HashSet<&str> = HashSet::new();
        let mut current = task;
        loop {
            if !chain.insert(current.name.as_str()) {
                bail!(
                    "circular dependency detected involving task '{}'",
                    current.name
                );
            }
            match &current.dependency {
                Some(dep) if !done.contains(dep.as_str()) => {
                    current = by_name[dep.as_str()];
                }
                _ => break,
            }
        }
        done.extend(chain);
    }

    Ok(())
}
