//! Cutting a fragment sequence at a character offset.

use crate::fragment::{Fragment, FragmentId, FragmentKind, FragmentTree};

/// Detaches everything from `offset` onward out of the sequence of `parent`.
///
/// `offset` counts display characters starting at the node at `start`; nodes
/// before `start` are left alone. With `skip_one` the character at the cut is
/// dropped. Composite nodes straddling the cut are split into the original
/// (keeping the children before the cut) and a shell copy holding the rest.
pub fn split_off(
    tree: &mut FragmentTree,
    parent: Option<FragmentId>,
    start: usize,
    offset: usize,
    skip_one: bool,
) -> Vec<FragmentId> {
    let mut remaining = offset;

    for idx in start..tree.sequence(parent).len() {
        let id = tree.sequence(parent)[idx];

        if remaining == 0 && !skip_one {
            return tree.sequence_mut(parent).split_off(idx);
        }

        let length = tree.char_len(id);
        if length <= remaining {
            remaining -= length;
            continue;
        }

        let mut remainder = Vec::new();
        if tree.kind(id).is_composite() {
            let children = split_off(tree, Some(id), 0, remaining, skip_one);
            if !children.is_empty() {
                let shell = tree.shell_clone(id);
                *tree.sequence_mut(Some(shell)) = children;
                remainder.push(shell);
            }
        } else if let FragmentKind::PlainText(text) = tree.kind_mut(id) {
            let byte_idx = char_to_byte_idx(text, remaining);
            let mut right = text.split_off(byte_idx);
            if skip_one && !right.is_empty() {
                right.remove(0);
            }
            if !right.is_empty() {
                remainder.push(tree.insert(Fragment::plain(right)));
            }
        }
        remainder.extend(tree.sequence_mut(parent).split_off(idx + 1));
        return remainder;
    }

    Vec::new()
}

/// Splits like [`split_off`] and puts the remainder back right after the cut.
///
/// Returns the first node of the remainder, or `None` when the offset is at
/// the end of the sequence.
pub fn split(
    tree: &mut FragmentTree,
    parent: Option<FragmentId>,
    start: usize,
    offset: usize,
    skip_one: bool,
) -> Option<FragmentId> {
    let remainder = split_off(tree, parent, start, offset, skip_one);
    let first = remainder.first().copied();
    tree.sequence_mut(parent).extend(remainder);
    first
}

pub fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_tree() -> FragmentTree {
        FragmentTree::from_fragments(vec![
            Fragment::plain("ab"),
            Fragment::link(
                "https://x.y",
                vec![Fragment::plain("cd"), Fragment::plain("ef")],
            ),
        ])
    }

    #[test]
    fn splits_flat_text_in_place() {
        let mut tree = FragmentTree::from_fragments(vec![Fragment::plain("abcdef")]);
        let remainder = split_off(&mut tree, None, 0, 3, false);

        assert_eq!(tree.sequence_text(None), "abc");
        assert_eq!(remainder.len(), 1);
        assert_eq!(tree.text(remainder[0]), "def");
    }

    #[test]
    fn skipping_drops_the_character_at_the_cut() {
        let mut tree = FragmentTree::from_fragments(vec![Fragment::plain("abcdef")]);
        let remainder = split_off(&mut tree, None, 0, 3, true);

        assert_eq!(tree.sequence_text(None), "abc");
        assert_eq!(tree.text(remainder[0]), "ef");
    }

    #[test]
    fn skipping_the_first_character_of_a_link() {
        let mut tree = FragmentTree::from_fragments(vec![Fragment::link(
            "https://x.y",
            vec![Fragment::plain(" ab")],
        )]);
        let first = split(&mut tree, None, 0, 0, true).unwrap();

        assert_eq!(
            tree.snapshot(None),
            vec![
                Fragment::link("https://x.y", vec![Fragment::plain("")]),
                Fragment::link("https://x.y", vec![Fragment::plain("ab")]),
            ]
        );
        assert_eq!(tree.roots()[1], first);
    }

    #[test]
    fn composite_is_cloned_around_the_cut() {
        let mut tree = nested_tree();
        let first = split(&mut tree, None, 0, 3, false).unwrap();

        let snapshot = tree.snapshot(None);
        assert_eq!(
            snapshot,
            vec![
                Fragment::plain("ab"),
                Fragment::link("https://x.y", vec![Fragment::plain("c")]),
                Fragment::link(
                    "https://x.y",
                    vec![Fragment::plain("d"), Fragment::plain("ef")]
                ),
            ]
        );
        assert_eq!(tree.roots()[2], first);
    }

    #[test]
    fn cut_on_child_boundary_moves_whole_children() {
        let mut tree = nested_tree();
        let remainder = split_off(&mut tree, None, 0, 4, false);

        assert_eq!(tree.sequence_text(None), "abcd");
        assert_eq!(remainder.len(), 1);
        assert_eq!(
            tree.snapshot_node(remainder[0]),
            Fragment::link("https://x.y", vec![Fragment::plain("ef")])
        );
    }

    #[test]
    fn cut_at_node_start_moves_the_node() {
        let mut tree = nested_tree();
        let remainder = split_off(&mut tree, None, 0, 2, false);

        assert_eq!(tree.roots().len(), 1);
        assert_eq!(remainder.len(), 1);
        assert_eq!(tree.text(remainder[0]), "cdef");
    }

    #[test]
    fn skip_at_node_boundary_drops_first_character_of_next_node() {
        let mut tree = nested_tree();
        let remainder = split_off(&mut tree, None, 0, 2, true);

        assert_eq!(tree.sequence_text(None), "ab");
        assert_eq!(tree.text(remainder[0]), "def");
    }

    #[test]
    fn offset_at_end_returns_nothing() {
        let mut tree = nested_tree();
        assert_eq!(split(&mut tree, None, 0, 6, false), None);
        assert_eq!(split(&mut tree, None, 0, 6, true), None);
        assert_eq!(tree.sequence_text(None), "abcdef");
    }

    #[test]
    fn start_index_limits_the_walk() {
        let mut tree = nested_tree();
        let first = split(&mut tree, None, 1, 1, false).unwrap();

        assert_eq!(tree.roots().len(), 3);
        assert_eq!(tree.text(tree.roots()[1]), "c");
        assert_eq!(tree.text(first), "def");
    }

    #[test]
    fn skipping_the_last_character_leaves_no_remainder() {
        let mut tree = FragmentTree::from_fragments(vec![Fragment::plain("abc\n")]);
        assert_eq!(split(&mut tree, None, 0, 3, true), None);
        assert_eq!(tree.sequence_text(None), "abc");
    }

    #[test]
    fn multibyte_text_is_cut_on_character_boundaries() {
        let mut tree = FragmentTree::from_fragments(vec![Fragment::plain("äöü")]);
        let remainder = split_off(&mut tree, None, 0, 1, false);
        assert_eq!(tree.sequence_text(None), "ä");
        assert_eq!(tree.text(remainder[0]), "öü");
    }
}
