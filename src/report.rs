use tracing::{info, warn};

use crate::recovery::{
    Recovery, RecoveryError,
    consensus::{ConsensusOutcome, consensus},
};

/// Logs a recovery: decoded points, primary secret and verifications.
///
/// When verifications diverge from the primary secret, a consensus over every k-subset is also
/// attempted and logged.
pub fn log_recovery(recovery: &Recovery) -> Result<(), RecoveryError> {
    info!(
        declared_total = recovery.declared_total,
        threshold = recovery.threshold,
        degree = recovery.degree(),
        "Recovering secret"
    );
    if recovery.declared_total != recovery.points.len() {
        warn!(
            "Document declares {} points but contains {}",
            recovery.declared_total,
            recovery.points.len()
        );
    }
    for point in recovery.points.iter() {
        info!(x = point.x, y = %point.y, "Decoded point");
    }

    let primary_xs: Vec<u64> = recovery.primary_points().iter().map(|p| p.x).collect();
    info!(points = ?primary_xs, secret = %recovery.primary, "Primary secret");

    for verification in &recovery.verifications {
        info!(
            selection = %verification.selection,
            secret = %verification.secret,
            matches = verification.secret == recovery.primary,
            "Verification"
        );
    }

    if recovery.is_consistent() {
        return Ok(());
    }

    warn!(
        "Verification secrets diverge from the primary secret, points are not samples of a single polynomial of degree {}",
        recovery.degree()
    );
    match consensus(&recovery.points, recovery.threshold)? {
        ConsensusOutcome::Agreed(consensus) => warn!(
            secret = %consensus.secret,
            supporting_subsets = consensus.supporting_subsets,
            evaluated_subsets = consensus.evaluated_subsets,
            suspects = ?consensus.suspects,
            "Consensus secret"
        ),
        ConsensusOutcome::NoAgreement { evaluated_subsets } => warn!(
            evaluated_subsets,
            "No value is supported by a majority of subsets, no consensus secret"
        ),
        ConsensusOutcome::TooManySubsets => {
            warn!("Too many subsets to compute a consensus secret")
        }
    }
    Ok(())
}
