use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::payload::RecordPayload;

/// Receipt for an accepted record.
#[derive(Clone, Debug)]
pub struct SubmitReceipt {
    pub id: String,
}

/// Submit endpoint seam. Failure means the caller keeps its state so the
/// user can retry without re-entering anything; nothing is tentatively
/// mutated before the call.
pub trait RecordSubmitter {
    fn submit(&self, payload: &RecordPayload) -> Result<SubmitReceipt>;
}

/// Fire-and-forget user notification. The flow never depends on its outcome.
pub trait Notifier {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Writes each accepted payload as pretty JSON into an outbox directory,
/// one uuid-named file per record.
pub struct OutboxSubmitter {
    root: PathBuf,
}

impl OutboxSubmitter {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl RecordSubmitter for OutboxSubmitter {
    fn submit(&self, payload: &RecordPayload) -> Result<SubmitReceipt> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create outbox {}", self.root.display()))?;
        let id = uuid::Uuid::new_v4().to_string();
        let path = self.root.join(format!("{id}.json"));
        let bytes = serde_json::to_vec_pretty(payload)?;
        std::fs::write(&path, bytes).with_context(|| format!("write record {}", path.display()))?;
        Ok(SubmitReceipt { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn payload() -> RecordPayload {
        RecordPayload {
            base_id: "base-1".to_string(),
            employee_ids: vec!["e1".to_string()],
            work_type_id: 12,
            zone_id: 7,
            piece_unit_id: None,
            piece_count: Some(0),
            work_time_hour: Some(0.0),
            area_id: None,
            category_id: None,
            remark: None,
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn writes_one_json_file_per_record() {
        let dir = tempdir().unwrap();
        let submitter = OutboxSubmitter::new(dir.path().join("outbox"));

        let receipt = submitter.submit(&payload()).unwrap();
        let path = dir.path().join("outbox").join(format!("{}.json", receipt.id));
        assert!(path.exists());

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"work_type_id\": 12"));
        assert!(text.contains("\"zone_id\": 7"));
    }

    #[test]
    fn receipts_are_unique() {
        let dir = tempdir().unwrap();
        let submitter = OutboxSubmitter::new(dir.path().to_path_buf());
        let a = submitter.submit(&payload()).unwrap();
        let b = submitter.submit(&payload()).unwrap();
        assert_ne!(a.id, b.id);
    }
}
