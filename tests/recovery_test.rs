mod common;
use common::{LARGE_DOCUMENT, SMALL_DOCUMENT, parse};
use num_bigint::{BigInt, BigUint};
use polynomial_secret_recovery::{
    Document, RecoveryError, recover_secret,
    recovery::{
        DecodeError, Selection, Verification,
        consensus::{ConsensusOutcome, consensus},
        split_secret,
    },
    report::log_recovery,
};

fn big(value: &str) -> BigInt {
    value.parse().unwrap()
}

#[test]
fn test_small_document() {
    let recovery = recover_secret(&parse(SMALL_DOCUMENT)).unwrap();

    let points: Vec<(u64, BigInt)> = recovery
        .points
        .iter()
        .map(|p| (p.x, p.y.clone()))
        .collect();
    assert_eq!(
        points,
        vec![
            (1, BigInt::from(4)),
            (2, BigInt::from(7)),
            (3, BigInt::from(12)),
            (6, BigInt::from(39)),
        ]
    );
    assert_eq!(recovery.primary, BigInt::from(3));
    assert_eq!(
        recovery.verifications,
        vec![Verification {
            selection: Selection::Last,
            secret: BigInt::from(3)
        }]
    );
    assert!(recovery.is_consistent());
    assert_eq!(recovery.degree(), 2);
    assert!(log_recovery(&recovery).is_ok());
}

#[test]
fn test_large_document_decodes_exactly() {
    let recovery = recover_secret(&parse(LARGE_DOCUMENT)).unwrap();

    let ys: Vec<BigInt> = recovery.points.iter().map(|p| p.y.clone()).collect();
    assert_eq!(
        ys,
        vec![
            big("995085094601491"),
            big("320923294898495900"),
            big("196563650089608567"),
            big("1016509518118225951"),
            big("3711974121218449851"),
            big("10788619898233492461"),
            big("26709394976508342463"),
            big("58725075613853308713"),
            big("117852986202006511971"),
            big("220003896831595324801"),
        ]
    );
}

#[test]
fn test_large_document_surfaces_divergence() {
    let recovery = recover_secret(&parse(LARGE_DOCUMENT)).unwrap();

    assert_eq!(recovery.primary, big("-6290016743746469796"));
    assert_eq!(
        recovery.verifications,
        vec![
            Verification {
                selection: Selection::Last,
                secret: big("79836264059301"),
            },
            Verification {
                selection: Selection::Centered { start: 1 },
                secret: big("8386875276278076089"),
            },
        ]
    );
    assert!(!recovery.is_consistent());
    assert!(log_recovery(&recovery).is_ok());

    let ConsensusOutcome::Agreed(consensus) =
        consensus(&recovery.points, recovery.threshold).unwrap()
    else {
        panic!("expected a consensus secret");
    };
    assert_eq!(consensus.secret, big("79836264049851"));
    assert_eq!(consensus.supporting_subsets, 8);
    assert_eq!(consensus.evaluated_subsets, 120);
    assert_eq!(consensus.suspects, vec![2, 8]);
}

#[test]
fn test_split_then_recover() {
    let secret: BigUint = "123456789012345678901234567890".parse().unwrap();
    let xs: Vec<u64> = (1..=9).collect();
    let shares = split_secret(&secret, 5, &xs);
    let document = Document::from_shares(5, &shares, |x| (x as u32 % 35) + 2).unwrap();

    let json = document.to_json_pretty().unwrap();
    let recovery = recover_secret(&parse(&json)).unwrap();
    assert_eq!(recovery.primary, BigInt::from(secret));
    assert_eq!(recovery.verifications.len(), 2);
    assert!(recovery.is_consistent());
}

#[test]
fn test_malformed_digit_references_point() {
    let document = parse(
        r#"{
            "keys": { "n": 3, "k": 2 },
            "1": { "base": "10", "value": "4" },
            "2": { "base": "2", "value": "123" },
            "3": { "base": "10", "value": "12" }
        }"#,
    );
    let err = recover_secret(&document).unwrap_err();
    assert_eq!(
        err,
        RecoveryError::MalformedDigit {
            id: "2".to_string(),
            source: DecodeError::InvalidDigit {
                character: '2',
                position: 1,
                base: 2
            }
        }
    );
    assert!(err.to_string().starts_with("point 2:"));
}

#[test]
fn test_duplicate_identifiers_are_rejected() {
    let document = parse(
        r#"{
            "keys": { "n": 2, "k": 2 },
            "1": { "base": "10", "value": "4" },
            "01": { "base": "10", "value": "5" }
        }"#,
    );
    assert_eq!(
        recover_secret(&document).unwrap_err(),
        RecoveryError::DuplicateCoordinate(1)
    );
}

#[test]
fn test_insufficient_points() {
    let document = parse(
        r#"{
            "keys": { "n": 4, "k": 3 },
            "1": { "base": "10", "value": "4" },
            "2": { "base": "10", "value": "7" }
        }"#,
    );
    assert_eq!(
        recover_secret(&document).unwrap_err(),
        RecoveryError::InsufficientPoints {
            required: 3,
            available: 2
        }
    );
}

#[test]
fn test_invalid_threshold() {
    for keys in [r#"{ "n": 2, "k": 3 }"#, r#"{ "n": 2, "k": 0 }"#] {
        let document = parse(&format!(
            r#"{{ "keys": {keys}, "1": {{ "base": "10", "value": "4" }} }}"#
        ));
        assert!(matches!(
            recover_secret(&document),
            Err(RecoveryError::MalformedDocument { field, .. }) if field == "keys.k"
        ));
    }
}

#[test]
fn test_unsupported_base() {
    let document = parse(
        r#"{
            "keys": { "n": 1, "k": 1 },
            "1": { "base": "1", "value": "0" }
        }"#,
    );
    assert_eq!(
        recover_secret(&document).unwrap_err(),
        RecoveryError::UnsupportedBase {
            id: "1".to_string(),
            base: "1".to_string()
        }
    );
}

#[test]
fn test_signed_identifier_is_rejected() {
    let document = parse(
        r#"{
            "keys": { "n": 2, "k": 1 },
            "1": { "base": "10", "value": "4" },
            "+1": { "base": "10", "value": "5" }
        }"#,
    );
    assert!(matches!(
        recover_secret(&document),
        Err(RecoveryError::MalformedDocument { field, .. }) if field == "+1"
    ));
}
