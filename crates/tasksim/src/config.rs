//! Experiment definitions: an XML file with one or more named experiments,
//! each declaring its hosts and the path of its task CSV.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use roxmltree::{Document, Node};

use crate::model::{ExperimentConfig, HostConfig};

/// Loads all experiments from the given XML file. The `<tasks>` path of each
/// experiment is resolved relative to the XML file's directory.
pub fn load_experiments(path: &Path) -> Result<HashMap<String, ExperimentConfig>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("configuration file not found: {}", path.display()))?;
    let doc = Document::parse(&text)
        .with_context(|| format!("failed to parse XML file: {}", path.display()))?;

    let root = doc.root_element();
    ensure!(
        root.has_tag_name("experiments"),
        "root element 'experiments' not found in {}",
        path.display()
    );

    let xml_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut configs = HashMap::new();
    for experiment in root.children().filter(|n| n.has_tag_name("experiment")) {
        let name = experiment
            .attribute("name")
            .ok_or_else(|| anyhow!("experiment missing 'name' attribute"))?;

        let tasks_text = child_text(&experiment, "tasks")
            .ok_or_else(|| anyhow!("experiment '{}' missing 'tasks' element", name))?;
        let tasks_path = {
            let p = Path::new(&tasks_text);
            if p.is_relative() {
                xml_dir.join(p)
            } else {
                p.to_path_buf()
            }
        };

        let mut hosts = Vec::new();
        let mut seen = HashSet::new();
        for host in experiment.children().filter(|n| n.has_tag_name("host")) {
            let id = host
                .attribute("id")
                .ok_or_else(|| anyhow!("host missing 'id' attribute in experiment '{}'", name))?;
            if !seen.insert(id.to_string()) {
                bail!("duplicate host id '{}' in experiment '{}'", id, name);
            }
            let cpu_cores = read_positive(&host, "cpu_cores", id)?;
            let ram = read_positive(&host, "ram", id)?;
            hosts.push(HostConfig {
                name: id.to_string(),
                cpu_cores: cpu_cores as u32,
                ram: ram as u64,
            });
        }
        ensure!(!hosts.is_empty(), "experiment '{}' must have at least 1 host", name);

        configs.insert(name.to_string(), ExperimentConfig { hosts, tasks_path });
    }

    Ok(configs)
}

/// Picks one experiment by name, listing the alternatives on a miss.
pub fn select_experiment(
    configs: &HashMap<String, ExperimentConfig>,
    name: &str,
) -> Result<ExperimentConfig> {
    configs.get(name).cloned().ok_or_else(|| {
        let mut available: Vec<_> = configs.keys().cloned().collect();
        available.sort();
        anyhow!(
            "unknown experiment '{}'. Available experiments: {}",
            name,
            available.join(", ")
        )
    })
}

fn child_text(node: &Node, tag: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn read_positive(host: &Node, tag: &str, host_id: &str) -> Result<i64> {
    let text = child_text(host, tag)
        .ok_or_else(|| anyhow!("missing {} for host '{}'", tag, host_id))?;
    let value: i64 = text
        .parse()
        .with_context(|| format!("invalid {} value for host '{}'", tag, host_id))?;
    ensure!(value > 0, "{} must be > 0 for host '{}', got {}", tag, host_id, value);
    Ok(value)
}
