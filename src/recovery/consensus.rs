use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_rational::BigRational;

use super::{PointSet, RecoveryError, interpolate_at_zero_exact};

/// Upper bound on the number of k-subsets a consensus run will interpolate.
pub const MAX_CONSENSUS_SUBSETS: u128 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consensus {
    pub secret: BigInt,
    /// Number of subsets that produced `secret`
    pub supporting_subsets: usize,
    pub evaluated_subsets: usize,
    /// `x` of the points absent from every subset that produced `secret`
    pub suspects: Vec<u64>,
}

struct Tally {
    count: usize,
    members: Vec<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsensusOutcome {
    Agreed(Consensus),
    /// No value is produced by more subsets than every other value, or each value by a single subset
    NoAgreement { evaluated_subsets: usize },
    /// More than [`MAX_CONSENSUS_SUBSETS`] subsets
    TooManySubsets,
}

/// Interpolates every k-subset of `points` and looks for a value at zero produced by strictly
/// more subsets than any other, and by at least two of them.
pub fn consensus(points: &PointSet, k: usize) -> Result<ConsensusOutcome, RecoveryError> {
    if k == 0 || points.len() < k {
        return Err(RecoveryError::InsufficientPoints {
            required: k.max(1),
            available: points.len(),
        });
    }
    if subset_count(points.len(), k).is_none() {
        return Ok(ConsensusOutcome::TooManySubsets);
    }

    let points = points.as_slice();
    let mut tallies: BTreeMap<BigRational, Tally> = BTreeMap::new();
    let mut indices: Vec<usize> = (0..k).collect();
    let mut subset = Vec::with_capacity(k);
    let mut evaluated_subsets = 0;
    loop {
        subset.clear();
        subset.extend(indices.iter().map(|i| points[*i].clone()));
        let value = interpolate_at_zero_exact(&subset)?;
        evaluated_subsets += 1;

        let tally = tallies.entry(value).or_insert_with(|| Tally {
            count: 0,
            members: vec![false; points.len()],
        });
        tally.count += 1;
        for i in &indices {
            tally.members[*i] = true;
        }

        if !next_combination(&mut indices, points.len()) {
            break;
        }
    }

    let mut winner: Option<(&BigRational, &Tally)> = None;
    let mut tied = false;
    for (value, tally) in &tallies {
        match winner {
            Some((_, best)) if tally.count < best.count => {}
            Some((_, best)) if tally.count == best.count => tied = true,
            _ => {
                winner = Some((value, tally));
                tied = false;
            }
        }
    }
    let Some((value, tally)) = winner.filter(|(_, best)| !tied && best.count > 1) else {
        return Ok(ConsensusOutcome::NoAgreement { evaluated_subsets });
    };

    Ok(ConsensusOutcome::Agreed(Consensus {
        secret: value.round().to_integer(),
        supporting_subsets: tally.count,
        evaluated_subsets,
        suspects: points
            .iter()
            .zip(&tally.members)
            .filter(|(_, member)| !**member)
            .map(|(p, _)| p.x)
            .collect(),
    }))
}

/// `C(n, k)` if it does not exceed [`MAX_CONSENSUS_SUBSETS`].
fn subset_count(n: usize, k: usize) -> Option<u128> {
    let k = k.min(n - k);
    let n = n as u128;
    let mut count: u128 = 1;
    for i in 0..k as u128 {
        // count is C(n, i) here, so the division is exact
        count = count * (n - i) / (i + 1);
        if count > MAX_CONSENSUS_SUBSETS {
            return None;
        }
    }
    Some(count)
}

/// Advances `indices` to the next k-combination of `0..n` in lexicographic order.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    for i in (0..k).rev() {
        if indices[i] < n - k + i {
            indices[i] += 1;
            for j in i + 1..k {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
    false
}
