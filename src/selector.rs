use crate::swatch::Swatch;

/// Indices of the `n` most populous swatches, least populous first.
///
/// Swatches without any pixels are never selected, so fewer than `n` indices are returned when there aren't enough
/// populated swatches. Among equal populations the swatch appearing later wins.
pub fn select_indices(swatches: &[Swatch], n: usize) -> Vec<usize> {
    let mut indices = (0..swatches.len())
        .filter(|&i| swatches[i].population() > 0)
        .collect::<Vec<_>>();

    // the sort is stable, so taking from the end prefers later swatches on ties
    indices.sort_by_key(|&i| swatches[i].population());

    if indices.len() < n {
        tracing::debug!(
            requested = n,
            available = indices.len(),
            "Fewer populated swatches than requested"
        );
    }

    let start = indices.len().saturating_sub(n);
    indices.split_off(start)
}

/// The `n` most populous swatches, least populous first. See [`select_indices`].
pub fn select(swatches: &[Swatch], n: usize) -> Vec<Swatch> {
    select_indices(swatches, n)
        .into_iter()
        .map(|i| swatches[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swatches(populations: &[u64]) -> Vec<Swatch> {
        populations
            .iter()
            .enumerate()
            .map(|(i, &population)| Swatch::new((i as u8, 0, 0), population))
            .collect()
    }

    #[test]
    fn takes_largest() {
        assert_eq!(select_indices(&swatches(&[5, 1, 9, 3, 7]), 3), vec![0, 4, 2]);
    }

    #[test]
    fn later_entries_win_ties() {
        assert_eq!(select_indices(&swatches(&[4, 4, 4, 4]), 2), vec![2, 3]);
        assert_eq!(select_indices(&swatches(&[2, 8, 2, 8, 2]), 3), vec![4, 1, 3]);
    }

    #[test]
    fn degrades_when_too_few() {
        assert_eq!(select_indices(&swatches(&[3, 1]), 8), vec![1, 0]);
    }

    #[test]
    fn skips_empty_swatches() {
        let mut all = swatches(&[6, 2, 0]);
        all.push(Swatch::placeholder());

        assert_eq!(
            select(&all, 4),
            vec![Swatch::new((1, 0, 0), 2), Swatch::new((0, 0, 0), 6)]
        );
    }

    #[test]
    fn selected_dominate_unselected() {
        let all = swatches(&[13, 2, 8, 21, 1, 8, 34, 5, 3]);
        let selected = select_indices(&all, 4);

        let min_selected = selected.iter().map(|&i| all[i].population()).min().unwrap();
        for i in (0..all.len()).filter(|i| !selected.contains(i)) {
            assert!(all[i].population() <= min_selected);
        }
    }

    #[test]
    fn zero_requested() {
        assert!(select_indices(&swatches(&[1, 2, 3]), 0).is_empty());
    }
}
