//! # Joint Projects
//!
//! A `JointProject` groups several joints of one job under shared design
//! settings so they can be evaluated together. Projects serialize to
//! human-readable JSON; reading and writing the file is the caller's job.
//!
//! ## Structure
//!
//! ```text
//! JointProject
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: DesignSettings (partial factors, code coefficients)
//! └── joints: HashMap<Uuid, JointInput>
//! ```
//!
//! A joint that fails to evaluate does not stop the batch; its error is
//! reported next to the others' results.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::project::JointProject;
//! use joint_core::JointInput;
//!
//! let mut project = JointProject::new("Jane Engineer", "26-014", "ACME Corp");
//! project.add_joint(JointInput::demo());
//!
//! let outcomes = project.evaluate_all();
//! assert!(outcomes[0].result.is_ok());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::joint::{calculate_with_sections, JointInput, JointResult};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{builtin_sections, SectionDb};
use crate::settings::DesignSettings;

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Batch container for the joints of one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointProject {
    pub meta: ProjectMetadata,

    /// Settings applied to every joint
    #[serde(default)]
    pub settings: DesignSettings,

    /// Joints keyed by UUID
    pub joints: HashMap<Uuid, JointInput>,
}

impl JointProject {
    /// Create a new empty project.
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        JointProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            joints: HashMap::new(),
        }
    }

    /// Parse a project from JSON and validate its settings
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let project: JointProject = serde_json::from_str(json)?;
        project.settings.validate()?;
        Ok(project)
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a joint; returns the UUID assigned to it.
    pub fn add_joint(&mut self, joint: JointInput) -> Uuid {
        let id = Uuid::new_v4();
        self.joints.insert(id, joint);
        self.touch();
        id
    }

    /// Remove a joint by UUID.
    pub fn remove_joint(&mut self, id: &Uuid) -> Option<JointInput> {
        let joint = self.joints.remove(id);
        if joint.is_some() {
            self.touch();
        }
        joint
    }

    pub fn get_joint(&self, id: &Uuid) -> Option<&JointInput> {
        self.joints.get(id)
    }

    /// Mutable access; marks the project as modified when the joint exists.
    pub fn get_joint_mut(&mut self, id: &Uuid) -> Option<&mut JointInput> {
        if self.joints.contains_key(id) {
            self.meta.modified = Utc::now();
            self.joints.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Evaluate every joint with the built-in section table.
    pub fn evaluate_all(&self) -> Vec<JointOutcome> {
        self.evaluate_all_with_sections(builtin_sections())
    }

    /// Evaluate every joint, ordered by label then UUID.
    pub fn evaluate_all_with_sections(&self, db: &SectionDb) -> Vec<JointOutcome> {
        let mut entries: Vec<_> = self.joints.iter().collect();
        entries.sort_by(|a, b| a.1.label.cmp(&b.1.label).then(a.0.cmp(b.0)));

        entries
            .into_iter()
            .map(|(id, joint)| {
                let result = calculate_with_sections(joint, &self.settings, db);
                if let Err(err) = &result {
                    tracing::warn!(label = %joint.label, code = err.error_code(), "joint failed: {}", err);
                }
                JointOutcome {
                    id: *id,
                    label: joint.label.clone(),
                    result,
                }
            })
            .collect()
    }
}

impl Default for JointProject {
    fn default() -> Self {
        JointProject::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Result of one joint in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointOutcome {
    pub id: Uuid,
    pub label: String,
    pub result: Result<JointResult, CalcError>,
}

impl JointOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
