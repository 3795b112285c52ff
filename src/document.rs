use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::recovery::{RecoveryError, Share, base};

const KEYS_FIELD: &str = "keys";
const ROOT_FIELD: &str = "<root>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    /// Declared number of points
    pub n: usize,
    /// Threshold, i.e. number of points needed to determine the polynomial
    pub k: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPoint {
    pub base: String,
    pub value: String,
}

/// Input document: a `keys` object next to one entry per point, keyed by the point identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    pub keys: Keys,
    #[serde(flatten)]
    pub entries: BTreeMap<String, EncodedPoint>,
}

impl Document {
    pub fn from_json(raw: &str) -> Result<Self, RecoveryError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| RecoveryError::malformed(ROOT_FIELD, e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RecoveryError> {
        let Value::Object(mut object) = value else {
            return Err(RecoveryError::malformed(
                ROOT_FIELD,
                "document must be a JSON object",
            ));
        };

        let keys = object
            .remove(KEYS_FIELD)
            .ok_or_else(|| RecoveryError::malformed(KEYS_FIELD, "missing field"))?;
        let keys: Keys = serde_json::from_value(keys)
            .map_err(|e| RecoveryError::malformed(KEYS_FIELD, e.to_string()))?;

        let entries = object
            .into_iter()
            .map(
                |(id, entry)| match serde_json::from_value::<EncodedPoint>(entry) {
                    Ok(point) => Ok((id, point)),
                    Err(e) => Err(RecoveryError::malformed(id, e.to_string())),
                },
            )
            .collect::<Result<BTreeMap<String, EncodedPoint>, RecoveryError>>()?;

        Ok(Self { keys, entries })
    }

    /// Builds a document with `n` set to the number of shares, each share encoded in `base_for(x)`.
    pub fn from_shares(
        threshold: usize,
        shares: &[Share],
        base_for: impl Fn(u64) -> u32,
    ) -> Result<Self, RecoveryError> {
        let mut entries = BTreeMap::new();
        for share in shares {
            let id = share.x.to_string();
            let radix = base_for(share.x);
            let value = base::encode(&share.y, radix).map_err(|source| {
                RecoveryError::MalformedDigit {
                    id: id.clone(),
                    source,
                }
            })?;
            if entries
                .insert(
                    id,
                    EncodedPoint {
                        base: radix.to_string(),
                        value,
                    },
                )
                .is_some()
            {
                return Err(RecoveryError::DuplicateCoordinate(share.x));
            }
        }
        Ok(Self {
            keys: Keys {
                n: shares.len(),
                k: threshold,
            },
            entries,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromStr for Document {
    type Err = RecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}
