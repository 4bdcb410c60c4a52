//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor`, which executes a batch of ledger
//! commands concurrently while producing the same final state as executing
//! them one by one in input order.
//!
//! # Design
//!
//! A batch is cut into consecutive segments:
//!
//! ```text
//! [create create] [transfer get transfer] [create] [transfer ...]
//!   sequential       conflict groups        sequential
//! ```
//!
//! - Runs of `create` commands execute sequentially, so ids are assigned in
//!   input order.
//! - Runs of other commands are split into conflict groups: two commands land
//!   in the same group when they touch a common account, directly or through
//!   a chain of other commands. Each group keeps input order and runs as its
//!   own tokio task; groups share no accounts, so their relative order does
//!   not affect the outcome.
//!
//! Each segment completes before the next one starts. A panic inside a group
//! task is re-raised on the caller once the group is joined.

use std::collections::HashMap;
use std::panic;

use crate::core::engine::CommandEngine;
use crate::types::{AccountId, CommandOutcome, LedgerCommand, LedgerError};
use tracing::error;

/// Result of processing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub command: LedgerCommand,

    /// The result of processing (success or error)
    pub result: Result<CommandOutcome, LedgerError>,
}

/// A run of commands that share an execution mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Consecutive `create` commands, executed in order
    Creates(Vec<LedgerCommand>),

    /// Consecutive non-create commands, executed as independent groups
    Conflicts(Vec<LedgerCommand>),
}

/// Batch processor with account-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: CommandEngine,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over `engine`
    pub fn new(engine: CommandEngine) -> Self {
        Self { engine }
    }

    /// Cut a batch into consecutive create and non-create segments
    pub fn segment(&self, batch: Vec<LedgerCommand>) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();

        for command in batch {
            let is_create = matches!(command, LedgerCommand::Create { .. });
            match segments.last_mut() {
                Some(Segment::Creates(run)) if is_create => run.push(command),
                Some(Segment::Conflicts(run)) if !is_create => run.push(command),
                _ if is_create => segments.push(Segment::Creates(vec![command])),
                _ => segments.push(Segment::Conflicts(vec![command])),
            }
        }

        segments
    }

    /// Partition commands into groups that share no account
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one group
    /// - Commands within a group keep their original relative order
    /// - Two commands touching the same account are in the same group
    /// - Groups are ordered by the position of their first command
    pub fn partition_by_accounts(&self, commands: Vec<LedgerCommand>) -> Vec<Vec<LedgerCommand>> {
        let mut parent: Vec<usize> = (0..commands.len()).collect();
        let mut first_seen: HashMap<AccountId, usize> = HashMap::new();

        for (index, command) in commands.iter().enumerate() {
            for id in command.touched_accounts() {
                match first_seen.get(&id) {
                    Some(&owner) => union(&mut parent, owner, index),
                    None => {
                        first_seen.insert(id, index);
                    }
                }
            }
        }

        let mut groups: Vec<Vec<LedgerCommand>> = Vec::new();
        let mut group_of_root: HashMap<usize, usize> = HashMap::new();

        for (index, command) in commands.into_iter().enumerate() {
            let root = find(&mut parent, index);
            let position = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[position].push(command);
        }

        groups
    }

    /// Process commands sequentially, in the order given
    ///
    /// All commands are processed even if some fail; results keep input order.
    pub async fn process_sequential(&self, commands: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        commands
            .into_iter()
            .map(|command| ProcessingResult {
                command,
                result: self.engine.execute(command),
            })
            .collect()
    }

    /// Process a batch of commands
    ///
    /// Results of a `create` run are in input order; results of concurrently
    /// executed groups are collected group by group.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let mut results = Vec::new();

        for segment in self.segment(batch) {
            match segment {
                Segment::Creates(commands) => {
                    results.extend(self.process_sequential(commands).await);
                }
                Segment::Conflicts(commands) => {
                    results.extend(self.process_groups(commands).await);
                }
            }
        }

        results
    }

    async fn process_groups(&self, commands: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let mut tasks = Vec::new();
        for group in self.partition_by_accounts(commands) {
            let processor = self.clone();
            let task = tokio::spawn(async move { processor.process_sequential(group).await });
            tasks.push(task);
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) if e.is_panic() => {
                    // A panicking group hit a broken ledger invariant
                    error!(error = %e, "batch worker task panicked");
                    panic::resume_unwind(e.into_panic());
                }
                Err(e) => {
                    error!(error = %e, "batch worker task failed");
                }
            }
        }

        results
    }
}

fn find(parent: &mut [usize], mut node: usize) -> usize {
    while parent[node] != node {
        parent[node] = parent[parent[node]];
        node = parent[node];
    }
    node
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find(parent, a);
    let root_b = find(parent, b);
    if root_a != root_b {
        // Keep the earlier command as the root
        let (root, child) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        parent[child] = root;
    }
}
