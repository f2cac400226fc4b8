use itertools::Itertools;

use crate::closure::equivalent;
use crate::FunctionalDependency;

/// Computes *a* minimal cover of `fds`: an equivalent set that is irreducible
/// under RHS splitting, LHS reduction and redundancy elimination.
///
/// The reduction tries removals in canonical sorted order with no
/// backtracking, so equivalent inputs in different shapes can yield different
/// (equally minimal) covers; callers must only rely on equivalence.
#[tracing::instrument(skip_all, fields(fds = fds.len()))]
pub fn minimal_cover(fds: &[FunctionalDependency]) -> Vec<FunctionalDependency> {
    // Split every multi-attribute RHS into singleton-RHS dependencies. This
    // is the reference set every later edit is checked against.
    let reference = fds
        .iter()
        .flat_map(|fd| {
            fd.rhs().iter().map(|attr| {
                FunctionalDependency::new(fd.lhs().clone(), std::iter::once(attr.clone()).collect())
            })
        })
        .sorted()
        .dedup()
        .collect::<Vec<_>>();

    let cover = reduce_lhs(reference.clone(), &reference);
    let cover = drop_redundant(cover, &reference);
    tracing::debug!(cover = ?cover, "reduced cover");

    merge_common_lhs(cover)
}

/// For every dependency with a composite LHS, tries dropping each LHS
/// attribute in sorted order, keeping a drop only when the edited set stays
/// equivalent to the reference set.
fn reduce_lhs(
    mut cover: Vec<FunctionalDependency>,
    reference: &[FunctionalDependency],
) -> Vec<FunctionalDependency> {
    for i in 0..cover.len() {
        let mut j = 0;
        while cover[i].lhs().len() >= 2 && j < cover[i].lhs().len() {
            let fd = &cover[i];
            let attr = fd.lhs().as_slice()[j].clone();
            let reduced = FunctionalDependency::new(
                fd.lhs().iter().filter(|a| **a != attr).cloned().collect(),
                fd.rhs().clone(),
            );

            let mut candidate = cover.clone();
            candidate[i] = reduced;
            if equivalent(reference, &candidate) {
                tracing::debug!(%fd, %attr, "dropped extraneous lhs attribute");
                cover = candidate;
                // The next attribute now sits at index `j`.
            } else {
                j += 1;
            }
        }
    }
    cover
}

/// Tentatively removes each dependency in turn, keeping the removal only when
/// the remaining set still covers the reference set.
fn drop_redundant(
    mut cover: Vec<FunctionalDependency>,
    reference: &[FunctionalDependency],
) -> Vec<FunctionalDependency> {
    let mut i = 0;
    while i < cover.len() {
        let candidate =
            cover.iter().enumerate().filter(|(k, _)| *k != i).map(|(_, fd)| fd.clone()).collect_vec();
        if equivalent(reference, &candidate) {
            tracing::debug!(fd = %cover[i], "dropped redundant dependency");
            cover = candidate;
        } else {
            i += 1;
        }
    }
    cover
}

/// Merges dependencies sharing an identical LHS by unioning their RHS sets.
/// Purely presentational; the reduction above works on singleton RHSs.
fn merge_common_lhs(cover: Vec<FunctionalDependency>) -> Vec<FunctionalDependency> {
    let mut merged: Vec<FunctionalDependency> = Vec::with_capacity(cover.len());
    for fd in cover.into_iter().sorted() {
        match merged.last_mut() {
            Some(last) if last.lhs() == fd.lhs() => {
                *last = FunctionalDependency::new(fd.lhs().clone(), last.rhs().union(fd.rhs()));
            }
            _ => merged.push(fd),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::closure::equivalent;

    fn fds(spec: &str) -> Vec<FunctionalDependency> {
        relnf_parse::parse_dependencies(spec)
            .unwrap()
            .into_iter()
            .map(|d| FunctionalDependency::new(d.lhs, d.rhs))
            .collect()
    }

    fn render(cover: &[FunctionalDependency]) -> String {
        cover.iter().map(ToString::to_string).join("; ")
    }

    #[test]
    fn cover_is_equivalent_to_input() {
        let input = fds("P->C,L,A,Q,T;C,L->P,A,Q,T;C->T;A->Q");
        let cover = minimal_cover(&input);
        assert!(equivalent(&input, &cover));
    }

    #[test]
    fn redundant_dependencies_are_dropped() {
        // A -> C follows transitively through B.
        let input = fds("A->B;B->C;A->C");
        let cover = minimal_cover(&input);
        assert_eq!(render(&cover), "{A} -> {B}; {B} -> {C}");
    }

    #[test]
    fn extraneous_lhs_attributes_are_dropped() {
        // In A,B -> C with A -> B, the B on the left is extraneous.
        let input = fds("A,B->C;A->B");
        let cover = minimal_cover(&input);
        assert_eq!(render(&cover), "{A} -> {B,C}");
    }

    #[test]
    fn common_lhs_merged_for_presentation() {
        let input = fds("A->B;A->C");
        let cover = minimal_cover(&input);
        assert_eq!(render(&cover), "{A} -> {B,C}");
    }

    #[test]
    fn cover_is_irreducible() {
        let input = fds("P->C,L,A,Q,T;C,L->P,A,Q,T;C->T;A->Q");
        let cover = minimal_cover(&input);

        // Removing any whole dependency breaks equivalence.
        for i in 0..cover.len() {
            let without =
                cover.iter().enumerate().filter(|(k, _)| *k != i).map(|(_, f)| f.clone()).collect_vec();
            assert!(!equivalent(&input, &without), "cover without {} still equivalent", cover[i]);
        }

        // Removing any single LHS attribute breaks equivalence too.
        for i in 0..cover.len() {
            if cover[i].lhs().len() < 2 {
                continue;
            }
            for attr in cover[i].lhs() {
                let mut weakened = cover.clone();
                weakened[i] = FunctionalDependency::new(
                    cover[i].lhs().iter().filter(|a| *a != attr).cloned().collect(),
                    cover[i].rhs().clone(),
                );
                assert!(
                    !equivalent(&input, &weakened),
                    "cover with {attr} dropped from {} still equivalent",
                    cover[i]
                );
            }
        }
    }

    #[test]
    fn cover_of_cover_is_equivalent() {
        let input = fds("A,B->C;A->B;B->C;C->A");
        let cover = minimal_cover(&input);
        let again = minimal_cover(&cover);
        assert!(equivalent(&cover, &again));
        assert!(equivalent(&input, &again));
    }
}
