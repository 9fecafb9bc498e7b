//! Majority vote over the labels of the selected neighbors.

use std::collections::HashMap;
use std::hash::Hash;

/// Returns the most frequent label, or `None` for an empty input.
///
/// `labels` must be ordered nearest-to-farthest. When several labels share the
/// highest count, the one that occurs first in that order wins.
pub fn majority_vote<'a, L, I>(labels: I) -> Option<&'a L>
where
    L: Eq + Hash + 'a,
    I: IntoIterator<Item = &'a L>,
{
    // Each label remembers its count and the position of its first occurrence.
    let mut label_counts: HashMap<&L, (usize, usize)> = HashMap::new();
    for (position, label) in labels.into_iter().enumerate() {
        label_counts.entry(label).or_insert((0, position)).0 += 1;
    }

    label_counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_wins() {
        let labels = ["B", "A", "A"];
        assert_eq!(majority_vote(labels.iter()), Some(&"A"));
    }

    #[test]
    fn test_tie_goes_to_first_occurrence() {
        let labels = [2, 1];
        assert_eq!(majority_vote(labels.iter()), Some(&2));

        let labels = [1, 2, 2, 1, 3];
        assert_eq!(majority_vote(labels.iter()), Some(&1));

        let labels = [3, 1, 2, 2, 1];
        assert_eq!(majority_vote(labels.iter()), Some(&1));
    }

    #[test]
    fn test_empty_input() {
        let labels: [u8; 0] = [];
        assert_eq!(majority_vote(labels.iter()), None);
    }
}
