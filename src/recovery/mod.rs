use std::fmt;

use num_bigint::{BigInt, BigUint};
use thiserror::Error;

use crate::document::{Document, EncodedPoint, Keys};

pub mod base;
pub mod consensus;
pub mod polynomial;

pub use base::DecodeError;
pub use polynomial::{Polynomial, interpolate_at_zero, interpolate_at_zero_exact};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("malformed document at `{field}`: {reason}")]
    MalformedDocument { field: String, reason: String },
    #[error("point {id}: unsupported base {base:?}, expected an integer in 2..=36")]
    UnsupportedBase { id: String, base: String },
    #[error("point {id}: {source}")]
    MalformedDigit {
        id: String,
        #[source]
        source: DecodeError,
    },
    #[error("two points share the x coordinate {0}")]
    DuplicateCoordinate(u64),
    #[error("{available} usable points available but {required} are required")]
    InsufficientPoints { required: usize, available: usize },
}

impl RecoveryError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: u64,
    pub y: BigInt,
}

impl Point {
    pub fn new(x: u64, y: BigInt) -> Self {
        Self { x, y }
    }
}

/// Points sorted by ascending `x`, with no two points sharing an `x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointSet(Vec<Point>);

impl PointSet {
    pub fn new(points: Vec<Point>) -> Result<Self, RecoveryError> {
        let mut points = points;
        points.sort_by_key(|p| p.x);
        if let Some(pair) = points.windows(2).find(|pair| pair[0].x == pair[1].x) {
            return Err(RecoveryError::DuplicateCoordinate(pair[0].x));
        }
        Ok(Self(points))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.0.iter()
    }
}

/// A window of `k` consecutive points of a [`PointSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    First,
    Last,
    Centered { start: usize },
}

impl Selection {
    pub fn window<'a>(&self, points: &'a PointSet, k: usize) -> Option<&'a [Point]> {
        let points = points.as_slice();
        match *self {
            Selection::First => points.get(..k),
            Selection::Last => points.len().checked_sub(k).map(|start| &points[start..]),
            Selection::Centered { start } => points.get(start..start.checked_add(k)?),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::First => write!(f, "first"),
            Selection::Last => write!(f, "last"),
            Selection::Centered { start } => write!(f, "centered (from index {start})"),
        }
    }
}

/// Verification windows run on top of the primary `First` window.
///
/// Last `k` points as soon as there is one extra point, a centered window once there are two.
pub fn verification_selections(available: usize, k: usize) -> Vec<Selection> {
    let mut selections = vec![];
    if available > k {
        selections.push(Selection::Last);
    }
    if available >= k + 2 {
        selections.push(Selection::Centered {
            start: (available - k) / 2,
        });
    }
    selections
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    pub selection: Selection,
    pub secret: BigInt,
}

#[derive(Clone, Debug)]
pub struct Recovery {
    pub threshold: usize,
    /// `n` as declared by the document, not necessarily the number of points
    pub declared_total: usize,
    pub points: PointSet,
    pub primary: BigInt,
    pub verifications: Vec<Verification>,
}

impl Recovery {
    pub fn degree(&self) -> usize {
        self.threshold.saturating_sub(1)
    }

    pub fn primary_points(&self) -> &[Point] {
        Selection::First
            .window(&self.points, self.threshold)
            .unwrap_or_default()
    }

    pub fn is_consistent(&self) -> bool {
        self.verifications.iter().all(|v| v.secret == self.primary)
    }
}

pub fn recover_secret(document: &Document) -> Result<Recovery, RecoveryError> {
    let Keys { n, k } = document.keys;
    if k == 0 {
        return Err(RecoveryError::malformed(
            "keys.k",
            "threshold must be at least 1",
        ));
    }
    if k > n {
        return Err(RecoveryError::malformed(
            "keys.k",
            format!("threshold {k} exceeds the declared total {n}"),
        ));
    }

    let points = document
        .entries
        .iter()
        .map(|(id, entry)| decode_point(id, entry))
        .collect::<Result<Vec<Point>, RecoveryError>>()?;

    recover_from_points(PointSet::new(points)?, n, k)
}

pub fn recover_from_points(
    points: PointSet,
    declared_total: usize,
    k: usize,
) -> Result<Recovery, RecoveryError> {
    let insufficient = || RecoveryError::InsufficientPoints {
        required: k.max(1),
        available: points.len(),
    };
    if k == 0 {
        return Err(insufficient());
    }
    let first = Selection::First
        .window(&points, k)
        .ok_or_else(insufficient)?;
    let primary = interpolate_at_zero(first)?;

    let mut verifications = Vec::new();
    for selection in verification_selections(points.len(), k) {
        let window = selection.window(&points, k).ok_or_else(insufficient)?;
        verifications.push(Verification {
            selection,
            secret: interpolate_at_zero(window)?,
        });
    }

    Ok(Recovery {
        threshold: k,
        declared_total,
        points,
        primary,
        verifications,
    })
}

fn decode_point(id: &str, entry: &EncodedPoint) -> Result<Point, RecoveryError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecoveryError::malformed(
            id,
            "identifier must only contain ASCII digits",
        ));
    }
    let x = id.parse::<u64>().map_err(|e| {
        RecoveryError::malformed(id, format!("identifier is not a non-negative integer: {e}"))
    })?;
    let unsupported_base = || RecoveryError::UnsupportedBase {
        id: id.to_string(),
        base: entry.base.clone(),
    };
    let radix = entry
        .base
        .trim()
        .parse::<u32>()
        .map_err(|_| unsupported_base())?;
    if !(base::MIN_BASE..=base::MAX_BASE).contains(&radix) {
        return Err(unsupported_base());
    }
    let y = base::decode(&entry.value, radix).map_err(|source| RecoveryError::MalformedDigit {
        id: id.to_string(),
        source,
    })?;
    Ok(Point::new(x, y.into()))
}

// ###########################################################
// ######################## SPLITTING ########################
// ###########################################################

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub x: u64,
    pub y: BigUint,
}

impl From<Share> for Point {
    fn from(share: Share) -> Self {
        Point::new(share.x, share.y.into())
    }
}

/// Samples a random polynomial of degree `threshold - 1` whose constant term is `secret` at every `xs`.
///
/// Coefficients are non-negative so every share is too.
pub fn split_secret(secret: &BigUint, threshold: usize, xs: &[u64]) -> Vec<Share> {
    let mut coefficients = vec![BigInt::from(secret.clone())];
    for i in 1..threshold {
        let coeff = if i == threshold - 1 {
            rand::random_range(1..=u64::MAX)
        } else {
            rand::random::<u64>()
        };
        coefficients.push(coeff.into());
    }
    let poly = Polynomial::new(coefficients);
    xs.iter()
        .map(|x| Share {
            x: *x,
            y: poly.evaluate(*x).magnitude().clone(),
        })
        .collect()
}
