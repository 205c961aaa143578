use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use super::step::{collection_chain, Field, Step};
use crate::tasks::{TaskKind, TaskResult};

/// Per-user conversation state. Lives in memory for the process lifetime.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    step: Step,
    fields: BTreeMap<Field, String>,
    #[serde(skip)]
    last_result: Option<TaskResult>,
    /// Bumped on every reset; an invocation started under an older
    /// generation must not write into this session
    generation: u64,
    /// An invocation is in flight
    busy: bool,
}

impl Session {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn active_kind(&self) -> Option<TaskKind> {
        self.step.kind()
    }

    pub fn fields(&self) -> &BTreeMap<Field, String> {
        &self.fields
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn last_result(&self) -> Option<&TaskResult> {
        self.last_result.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Back to `Idle` with nothing collected.
    pub fn reset(&mut self) {
        self.step = Step::Idle;
        self.fields.clear();
        self.last_result = None;
        self.busy = false;
        self.generation += 1;
    }

    /// Resets and moves to the first collection step of `kind`.
    pub fn enter(&mut self, kind: TaskKind) {
        self.reset();
        self.step = collection_chain(kind)[0].0;
    }

    /// Stores a collected value. Refused when the field does not belong to
    /// the active kind.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.active_kind() != Some(field.kind()) {
            warn!(
                "refusing field {:?} in step {}",
                field,
                self.step.as_str()
            );
            return false;
        }
        self.fields.insert(field, value.into());
        true
    }

    /// Moves to another step of the active kind. Use `reset` to go idle
    /// and `enter` to change kind.
    pub fn advance(&mut self, step: Step) -> bool {
        if step.kind().is_none() || step.kind() != self.active_kind() {
            warn!("refusing move from {} to {}", self.step, step);
            return false;
        }
        self.step = step;
        true
    }

    /// First collection step whose field is still missing.
    pub fn next_missing(&self) -> Option<Step> {
        let kind = self.active_kind()?;
        collection_chain(kind)
            .iter()
            .find(|(_, field)| !self.fields.contains_key(field))
            .map(|(step, _)| *step)
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub(crate) fn set_last_result(&mut self, result: TaskResult) {
        self.last_result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_clears_previous_fields() {
        let mut session = Session::default();
        session.enter(TaskKind::Document);
        assert!(session.set_field(Field::DocType, "Letter"));
        let before = session.generation();

        session.enter(TaskKind::Legal);
        assert_eq!(session.step(), Step::AwaitingContract);
        assert!(session.fields().is_empty());
        assert!(session.generation() > before);
    }

    #[test]
    fn test_fields_must_match_kind() {
        let mut session = Session::default();
        assert!(!session.set_field(Field::Idea, "no kind yet"));

        session.enter(TaskKind::Marketing);
        assert!(!session.set_field(Field::ContractText, "wrong kind"));
        assert!(session.set_field(Field::Idea, "Coffee"));
        assert_eq!(session.field(Field::Idea), Some("Coffee"));
    }

    #[test]
    fn test_advance_stays_within_kind() {
        let mut session = Session::default();
        session.enter(TaskKind::Finance);
        assert!(!session.advance(Step::OfferingReminder));
        assert!(!session.advance(Step::Idle));
        assert!(session.advance(Step::ChoosingFollowUp));
    }

    #[test]
    fn test_next_missing_walks_chain() {
        let mut session = Session::default();
        session.enter(TaskKind::Document);
        assert_eq!(session.next_missing(), Some(Step::ChoosingDocType));
        session.set_field(Field::Content, "Partnership proposal");
        assert_eq!(session.next_missing(), Some(Step::ChoosingDocType));
        session.set_field(Field::DocType, "Letter");
        assert_eq!(session.next_missing(), None);
    }
}
