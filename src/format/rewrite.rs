use std::collections::{HashSet, VecDeque};

use super::Formatter;
use crate::fragment::{Fragment, FragmentId, FragmentKind, FragmentTree, FragmentType};

/// Counters describing how much work a rewrite did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Full traversals over a sequence, summed over all sequences.
    pub passes: usize,
    /// Unparsed nodes replaced by formatter output.
    pub splices: usize,
    /// Unparsed nodes turned into plain text because nothing matched.
    pub conversions: usize,
}

struct Task {
    parent: Option<FragmentId>,
    excluded: Vec<FragmentType>,
}

/// Applies `formatters` to every unparsed node in `tree` until none is left.
///
/// Each sequence is walked in passes. A pass that splices formatter output
/// into the sequence is followed by another one from the head; the first pass
/// without a splice ends the sequence. Composite nodes queue their child list
/// as a new task that may not use their own fragment type again.
pub fn rewrite(tree: &mut FragmentTree, formatters: &[Box<dyn Formatter>]) -> RewriteStats {
    let mut stats = RewriteStats::default();
    let mut scheduled: HashSet<FragmentId> = HashSet::new();
    let mut queue = VecDeque::from([Task {
        parent: None,
        excluded: Vec::new(),
    }]);

    while let Some(task) = queue.pop_front() {
        loop {
            stats.passes += 1;
            let mut progress = false;
            let mut idx = 0;

            while idx < tree.sequence(task.parent).len() {
                let id = tree.sequence(task.parent)[idx];

                if let FragmentKind::Unparsed(raw) = tree.kind(id) {
                    let raw = raw.clone();
                    match apply_first_match(&raw, formatters, &task.excluded) {
                        Some(fragments) => {
                            let inserted: Vec<FragmentId> = fragments
                                .into_iter()
                                .map(|fragment| tree.insert(fragment))
                                .collect();
                            let count = inserted.len();
                            let sequence = tree.sequence_mut(task.parent);
                            let tail = sequence.split_off(idx + 1);
                            sequence.pop();
                            sequence.extend(inserted);
                            sequence.extend(tail);
                            stats.splices += 1;
                            progress = true;
                            idx += count;
                            continue;
                        }
                        None => {
                            *tree.kind_mut(id) = FragmentKind::PlainText(raw);
                            stats.conversions += 1;
                        }
                    }
                } else if !tree.children(id).is_empty() && scheduled.insert(id) {
                    let own = tree.kind(id).fragment_type();
                    let mut excluded = task.excluded.clone();
                    if !excluded.contains(&own) {
                        excluded.push(own);
                    }
                    queue.push_back(Task {
                        parent: Some(id),
                        excluded,
                    });
                }

                idx += 1;
            }

            if !progress {
                break;
            }
        }
    }

    stats
}

fn apply_first_match(
    raw: &str,
    formatters: &[Box<dyn Formatter>],
    excluded: &[FragmentType],
) -> Option<Vec<Fragment>> {
    for formatter in formatters {
        if excluded.contains(&formatter.fragment_type()) {
            continue;
        }
        if let Some(fragments) = formatter.format(raw) {
            debug_assert!(
                fragments
                    .iter()
                    .any(|fragment| !matches!(fragment.kind, FragmentKind::Unparsed(_))),
                "formatter for {} matched without producing a parsed fragment",
                formatter.fragment_type()
            );
            return Some(fragments);
        }
    }
    None
}
