use anyhow::Result;
use croplog_core::{
    DependencyMap, DraftForm, Employee, FieldKey, FieldValue, SelectionSet, TaskSnapshot,
    SNAPSHOT_VERSION,
};
use croplog_storage::KvStore;

use crate::submit::{Notifier, RecordSubmitter, SubmitReceipt};
use crate::payload::assemble_payload;

/// Derived task state. ACTIVE survives navigations and reloads until the
/// task is explicitly cleared; there is no expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Active,
}

/// Per-task sync bridge over the selection set and the draft form.
///
/// `open` plays the page-load role: it rehydrates both stores from the
/// persisted snapshot when the version matches and falls back to baseline
/// otherwise. Every mutation writes the snapshot back through immediately;
/// mutation frequency is interaction-bound, so there is no batching.
pub struct RecordSession {
    kv: KvStore,
    task_key: String,
    deps: DependencyMap,
    selection: SelectionSet<Employee>,
    draft: DraftForm,
}

impl RecordSession {
    pub fn open(kv: KvStore, task_key: impl Into<String>) -> Self {
        Self::with_deps(kv, task_key, DependencyMap::work_record())
    }

    pub fn with_deps(kv: KvStore, task_key: impl Into<String>, deps: DependencyMap) -> Self {
        let task_key = task_key.into();
        let snapshot: Option<TaskSnapshot> = kv.get(&task_key, None);
        let (selection, draft) = match snapshot {
            Some(snap) if snap.version == SNAPSHOT_VERSION => (
                SelectionSet::from_items(snap.selection),
                DraftForm::from_fields(snap.draft),
            ),
            Some(snap) => {
                // A mismatched snapshot is never partially applied; the next
                // write-through overwrites it.
                tracing::debug!(
                    found = snap.version,
                    expected = SNAPSHOT_VERSION,
                    "snapshot version mismatch; starting from baseline"
                );
                (SelectionSet::new(), DraftForm::baseline())
            }
            None => (SelectionSet::new(), DraftForm::baseline()),
        };
        Self {
            kv,
            task_key,
            deps,
            selection,
            draft,
        }
    }

    pub fn selection(&self) -> &SelectionSet<Employee> {
        &self.selection
    }

    pub fn draft(&self) -> &DraftForm {
        &self.draft
    }

    pub fn state(&self) -> SessionState {
        if self.selection.is_empty() && self.draft.is_baseline() {
            SessionState::Empty
        } else {
            SessionState::Active
        }
    }

    pub fn select(&mut self, employee: Employee) -> bool {
        let added = self.selection.add(employee);
        self.persist();
        added
    }

    pub fn unselect(&mut self, id: &str) -> bool {
        let removed = self.selection.remove(id);
        self.persist();
        removed
    }

    /// Returns whether the employee is now selected.
    pub fn toggle(&mut self, employee: Employee) -> bool {
        let selected = self.selection.toggle(employee);
        self.persist();
        selected
    }

    pub fn select_all(&mut self, candidates: impl IntoIterator<Item = Employee>) {
        self.selection.select_all(candidates);
        self.persist();
    }

    pub fn unselect_all<'a>(&mut self, candidates: impl IntoIterator<Item = &'a Employee>) {
        self.selection.unselect_all(candidates);
        self.persist();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.persist();
    }

    /// Set one field, then clear its declared dependents before anything can
    /// read the new state.
    pub fn set_field(&mut self, key: FieldKey, value: FieldValue) {
        self.draft.set(key, value);
        self.deps.invalidate_dependents(&mut self.draft, key);
        self.persist();
    }

    pub fn unset_field(&mut self, key: FieldKey) {
        self.draft.unset(key);
        self.deps.invalidate_dependents(&mut self.draft, key);
        self.persist();
    }

    /// Apply a merge-patch entry by entry, invalidating each key's dependents
    /// as it lands. A later entry can therefore re-set a field an earlier
    /// entry's dependents cleared.
    pub fn patch(&mut self, partial: impl IntoIterator<Item = (FieldKey, FieldValue)>) {
        for (key, value) in partial {
            self.draft.set(key, value);
            self.deps.invalidate_dependents(&mut self.draft, key);
        }
        self.persist();
    }

    pub fn reset_form(&mut self) {
        self.draft.reset();
        self.persist();
    }

    /// Ends the logical task: empties both stores and drops the snapshot.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.draft.reset();
        self.kv.remove(&self.task_key);
    }

    /// The submit step of the flow: assemble the payload, hand it to the
    /// submitter, and on success clear the task. Failure leaves every store
    /// untouched so the user retries without re-entering anything.
    pub fn submit(
        &mut self,
        base_id: &str,
        submitter: &dyn RecordSubmitter,
        notifier: &dyn Notifier,
    ) -> Result<SubmitReceipt> {
        let payload = assemble_payload(base_id, &self.selection, &self.draft)?;
        match submitter.submit(&payload) {
            Ok(receipt) => {
                tracing::info!(receipt = %receipt.id, "work record submitted");
                notifier.success("work record submitted");
                self.clear();
                Ok(receipt)
            }
            Err(error) => {
                tracing::warn!(error = %error, "work record submit failed; draft kept for retry");
                notifier.failure("submit failed, draft kept for retry");
                Err(error)
            }
        }
    }

    fn persist(&self) {
        let snapshot = TaskSnapshot::capture(&self.selection, &self.draft);
        self.kv.set(&self.task_key, &snapshot);
    }
}
