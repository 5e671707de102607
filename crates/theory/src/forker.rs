//! Forking and lineage tracking.

use std::collections::HashMap;

use chrono::Utc;

use crate::model::{ForkResult, Theory, TheoryLineage};

/// Increments the patch version: `X.Y.Z -> X.Y.(Z+1)`.
pub fn increment_version(version: &str) -> String {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() == 3 {
        if let (Ok(major), Ok(minor), Ok(patch)) =
            (parts[0].parse::<u64>(), parts[1].parse::<u64>(), parts[2].parse::<u64>())
        {
            return format!("{major}.{minor}.{}", patch + 1);
        }
    }
    "1.0.1".to_string()
}

pub struct Forker {
    lineage: HashMap<(String, String), TheoryLineage>,
}

impl Forker {
    pub fn new() -> Self {
        Self {
            lineage: HashMap::new(),
        }
    }

    /// Deep-copies `parent`, applies `modifications`' fields onto the
    /// clone by key name, bumps the patch version, and records a lineage
    /// row from the new `(id, version)` back to the parent's.
    pub fn fork(
        &mut self,
        parent: &Theory,
        new_theory_id: &str,
        modifications: serde_json::Map<String, serde_json::Value>,
        fork_reason: &str,
    ) -> (ForkResult, Theory) {
        let mut new_theory = parent.clone();
        new_theory.id = new_theory_id.to_string();
        new_theory.version = increment_version(&parent.version);
        new_theory.updated_at = Utc::now();

        let mut changes_made = Vec::new();
        let mut value = serde_json::to_value(&new_theory).expect("theory serializes");
        if let Some(obj) = value.as_object_mut() {
            for (key, new_value) in modifications {
                let existed = obj.contains_key(&key);
                let changed = obj.get(&key) != Some(&new_value);
                if existed && changed {
                    changes_made.push(format!("Modified {key}"));
                } else if !existed {
                    changes_made.push(format!("Added {key}"));
                }
                obj.insert(key, new_value);
            }
        }
        if let Ok(patched) = serde_json::from_value::<Theory>(value) {
            new_theory = patched;
        }

        let lineage = TheoryLineage {
            theory_id: new_theory.id.clone(),
            version: new_theory.version.clone(),
            parent_id: Some(parent.id.clone()),
            parent_version: Some(parent.version.clone()),
            fork_reason: fork_reason.to_string(),
            created_at: Utc::now(),
        };
        self.lineage.insert(
            (new_theory.id.clone(), new_theory.version.clone()),
            lineage,
        );

        let result = ForkResult {
            new_theory_id: new_theory.id.clone(),
            new_version: new_theory.version.clone(),
            parent_id: parent.id.clone(),
            parent_version: parent.version.clone(),
            changes_made,
        };
        (result, new_theory)
    }

    pub fn lineage(&self, theory_id: &str, version: &str) -> Option<TheoryLineage> {
        self.lineage.get(&(theory_id.to_string(), version.to_string())).cloned()
    }

    pub fn children(&self, parent_id: &str, parent_version: &str) -> Vec<TheoryLineage> {
        self.lineage
            .values()
            .filter(|l| {
                l.parent_id.as_deref() == Some(parent_id)
                    && l.parent_version.as_deref() == Some(parent_version)
            })
            .cloned()
            .collect()
    }

    pub fn ancestry(&self, theory_id: &str, version: &str) -> Vec<TheoryLineage> {
        let mut chain = Vec::new();
        let mut current = self.lineage(theory_id, version);
        while let Some(lineage) = current {
            let next = match (&lineage.parent_id, &lineage.parent_version) {
                (Some(id), Some(v)) => self.lineage(id, v),
                _ => None,
            };
            chain.push(lineage);
            current = next;
        }
        chain
    }
}

impl Default for Forker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_version_bumps_patch() {
        assert_eq!(increment_version("1.2.3"), "1.2.4");
    }

    #[test]
    fn increment_version_falls_back_on_malformed_input() {
        assert_eq!(increment_version("not-a-version"), "1.0.1");
    }
}
