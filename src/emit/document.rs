use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::emit::EditorKind;
use crate::foundation::error::CutResult;

/// Per-render identity: fresh UUIDs and the creation time used in project and sequence names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentStamp {
    pub event_uid: Uuid,
    pub project_uid: Uuid,
    pub sequence_uid: Uuid,
    pub created: DateTime<Utc>,
}

impl DocumentStamp {
    /// Random UUIDs and the current UTC time.
    pub fn now() -> Self {
        Self {
            event_uid: Uuid::new_v4(),
            project_uid: Uuid::new_v4(),
            sequence_uid: Uuid::new_v4(),
            created: Utc::now(),
        }
    }

    /// Fixed stamp, for reproducible output.
    pub fn fixed(created: DateTime<Utc>, uids: [Uuid; 3]) -> Self {
        let [event_uid, project_uid, sequence_uid] = uids;
        Self {
            event_uid,
            project_uid,
            sequence_uid,
            created,
        }
    }

    /// `YYYYMMDD-HHMMSS`, appended to project and sequence names.
    pub fn suffix(&self) -> String {
        self.created.format("%Y%m%d-%H%M%S").to_string()
    }

    /// FCPX `modDate` attribute.
    pub fn mod_date(&self) -> String {
        self.created.format("%Y-%m-%d %H:%M:%S %z").to_string()
    }
}

/// A rendered timeline document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub kind: EditorKind,
    pub xml: String,
}

impl Document {
    pub fn as_str(&self) -> &str {
        &self.xml
    }

    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> CutResult<()> {
        std::fs::write(path, self.xml.as_bytes())
            .with_context(|| format!("write document '{}'", path.display()))?;
        tracing::info!(path = %path.display(), editor = %self.kind, "wrote timeline document");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emit/document.rs"]
mod tests;
