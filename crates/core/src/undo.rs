//! Per-user undo/redo log.
//!
//! Both stacks are ordered by a monotonic sequence number shared by the two
//! tables. Undo and redo are pure transitions over a [`UndoRedoLog`]: they pick
//! the batch to replay and return the log as it will be once the batch has
//! moved to the other stack. The persistence layer applies the same moves.

use crate::error::CoreError;
use crate::types::DbId;

/// Which of the two stacks an entry lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    Undo,
    Redo,
}

impl StackKind {
    /// The stack an entry moves to once replayed.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Undo => Self::Redo,
            Self::Redo => Self::Undo,
        }
    }

    /// Verb used in messages and logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// One stack item: a pointer to a command in the log of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    /// Position in the log; higher is more recent.
    pub seq: i64,
    pub user_id: DbId,
    pub command_id: DbId,
    pub transaction_id: Option<DbId>,
    /// Copied from the command; an undo batch containing it is rejected.
    pub refuse_undo: bool,
}

/// Result of an undo or redo transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Entries to replay, in replay order (most recent first).
    pub moved: Vec<StackEntry>,
    /// The log after every moved entry has been pushed onto the other stack.
    pub log: UndoRedoLog,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }
}

/// Undo and redo stacks of one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoRedoLog {
    undo: Vec<StackEntry>,
    redo: Vec<StackEntry>,
    /// Highest sequence number ever assigned; never decreases.
    last_seq: i64,
}

impl UndoRedoLog {
    pub fn new(undo: Vec<StackEntry>, redo: Vec<StackEntry>) -> Self {
        let last_seq = undo.iter().chain(redo.iter()).map(|e| e.seq).max().unwrap_or(0);
        let mut log = Self {
            undo,
            redo,
            last_seq,
        };
        log.undo.sort_by_key(|e| e.seq);
        log.redo.sort_by_key(|e| e.seq);
        log
    }

    pub fn stack(&self, kind: StackKind) -> &[StackEntry] {
        match kind {
            StackKind::Undo => &self.undo,
            StackKind::Redo => &self.redo,
        }
    }

    fn stack_mut(&mut self, kind: StackKind) -> &mut Vec<StackEntry> {
        match kind {
            StackKind::Undo => &mut self.undo,
            StackKind::Redo => &mut self.redo,
        }
    }

    /// Sequence number the next pushed entry receives.
    pub fn next_seq(&self) -> i64 {
        self.last_seq + 1
    }

    /// Push a new entry on top of `kind`, assigning it the next sequence number.
    pub fn push(&mut self, kind: StackKind, mut entry: StackEntry) -> i64 {
        self.last_seq = self.next_seq();
        entry.seq = self.last_seq;
        self.stack_mut(kind).push(entry);
        self.last_seq
    }

    /// Most recent entry of a stack, optionally restricted to one command.
    pub fn top(&self, kind: StackKind, command_id: Option<DbId>) -> Option<&StackEntry> {
        self.stack(kind)
            .iter()
            .filter(|e| command_id.is_none_or(|id| e.command_id == id))
            .max_by_key(|e| e.seq)
    }

    /// Entries replayed together when `kind` is popped.
    ///
    /// Without a transaction only the top entry is returned. When the top entry
    /// belongs to a transaction, every entry of that transaction on the stack
    /// is returned, most recent first.
    pub fn batch(&self, kind: StackKind, command_id: Option<DbId>) -> Vec<StackEntry> {
        let Some(top) = self.top(kind, command_id) else {
            return Vec::new();
        };
        match top.transaction_id {
            None => vec![top.clone()],
            Some(tx) => {
                let mut items: Vec<StackEntry> = self
                    .stack(kind)
                    .iter()
                    .filter(|e| e.transaction_id == Some(tx))
                    .cloned()
                    .collect();
                items.sort_by(|a, b| b.seq.cmp(&a.seq));
                items
            }
        }
    }

    /// Undo the most recent command (or transaction) of the log.
    pub fn undo(&self, command_id: Option<DbId>) -> Result<Transition, CoreError> {
        let batch = self.batch(StackKind::Undo, command_id);
        if let Some(refused) = batch.iter().find(|e| e.refuse_undo) {
            return Err(CoreError::Constraint(format!(
                "Command {} cannot be undone",
                refused.command_id
            )));
        }
        Ok(self.transfer(StackKind::Undo, batch))
    }

    /// Redo the most recently undone command (or transaction) of the log.
    pub fn redo(&self, command_id: Option<DbId>) -> Result<Transition, CoreError> {
        let batch = self.batch(StackKind::Redo, command_id);
        Ok(self.transfer(StackKind::Redo, batch))
    }

    fn transfer(&self, from: StackKind, batch: Vec<StackEntry>) -> Transition {
        let mut log = self.clone();
        log.stack_mut(from)
            .retain(|e| !batch.iter().any(|b| b.seq == e.seq));
        for entry in &batch {
            log.push(from.opposite(), entry.clone());
        }
        Transition { moved: batch, log }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn entry(seq: i64, command_id: DbId, tx: Option<DbId>) -> StackEntry {
        StackEntry {
            seq,
            user_id: 1,
            command_id,
            transaction_id: tx,
            refuse_undo: false,
        }
    }

    fn commands(entries: &[StackEntry]) -> Vec<DbId> {
        entries.iter().map(|e| e.command_id).collect()
    }

    #[test]
    fn empty_log_has_nothing_to_undo() {
        let log = UndoRedoLog::default();
        let t = log.undo(None).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.log, log);
        assert!(log.redo(None).unwrap().is_empty());
    }

    #[test]
    fn undo_without_transaction_takes_only_the_top() {
        let log = UndoRedoLog::new(vec![entry(1, 10, None), entry(2, 11, None)], vec![]);
        let t = log.undo(None).unwrap();
        assert_eq!(commands(&t.moved), vec![11]);
        assert_eq!(commands(t.log.stack(StackKind::Undo)), vec![10]);
        assert_eq!(commands(t.log.stack(StackKind::Redo)), vec![11]);
        assert_eq!(t.log.stack(StackKind::Redo)[0].seq, 3);
    }

    #[test]
    fn undo_with_transaction_takes_whole_batch_most_recent_first() {
        let log = UndoRedoLog::new(
            vec![
                entry(1, 10, None),
                entry(2, 11, Some(5)),
                entry(3, 12, Some(5)),
            ],
            vec![],
        );
        let t = log.undo(None).unwrap();
        assert_eq!(commands(&t.moved), vec![12, 11]);
        assert_eq!(commands(t.log.stack(StackKind::Undo)), vec![10]);
        assert_eq!(commands(t.log.stack(StackKind::Redo)), vec![12, 11]);
    }

    #[test]
    fn undo_for_specific_command() {
        let log = UndoRedoLog::new(vec![entry(1, 10, None), entry(2, 11, None)], vec![]);
        let t = log.undo(Some(10)).unwrap();
        assert_eq!(commands(&t.moved), vec![10]);
        assert_eq!(commands(t.log.stack(StackKind::Undo)), vec![11]);
        assert!(log.undo(Some(99)).unwrap().is_empty());
    }

    #[test]
    fn refused_undo_fails_for_whole_batch() {
        let mut refused = entry(2, 11, Some(5));
        refused.refuse_undo = true;
        let log = UndoRedoLog::new(vec![refused, entry(3, 12, Some(5))], vec![]);
        assert_matches!(log.undo(None), Err(CoreError::Constraint(_)));
    }

    #[test]
    fn undo_then_redo_restores_stack_order() {
        let log = UndoRedoLog::new(
            vec![entry(1, 10, Some(5)), entry(2, 11, Some(5))],
            vec![],
        );
        let undone = log.undo(None).unwrap();
        let redone = undone.log.redo(None).unwrap();

        // Redo replays the cascade in reverse of the undo order.
        assert_eq!(commands(&redone.moved), vec![10, 11]);
        assert!(redone.log.stack(StackKind::Redo).is_empty());
        assert_eq!(commands(redone.log.stack(StackKind::Undo)), vec![10, 11]);
    }

    #[test]
    fn sequence_numbers_are_monotonic_across_stacks() {
        let mut log = UndoRedoLog::new(vec![entry(4, 10, None)], vec![entry(7, 11, None)]);
        assert_eq!(log.next_seq(), 8);
        assert_eq!(log.push(StackKind::Undo, entry(0, 12, None)), 8);
        assert_eq!(log.top(StackKind::Undo, None).map(|e| e.command_id), Some(12));
    }

    #[test]
    fn moved_entries_never_reuse_sequence_numbers() {
        let log = UndoRedoLog::new(vec![entry(1, 10, None), entry(2, 11, None)], vec![]);
        let undone = log.undo(None).unwrap();
        assert_eq!(undone.log.stack(StackKind::Redo)[0].seq, 3);

        let redone = undone.log.redo(None).unwrap();
        let seqs: Vec<i64> = redone.log.stack(StackKind::Undo).iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 4]);
        assert_eq!(redone.log.next_seq(), 5);
    }

    #[test]
    fn stack_kind_helpers() {
        assert_eq!(StackKind::Undo.opposite(), StackKind::Redo);
        assert_eq!(StackKind::Redo.verb(), "redo");
    }
}
