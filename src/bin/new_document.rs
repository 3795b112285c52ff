use num_bigint::BigUint;
use polynomial_secret_recovery::{Document, recovery::split_secret};

// This binary splits a secret into `n` points of a random polynomial of degree `k - 1`
// and prints the resulting document, each point encoded in a random base.
// Run via
// ```
// cargo run --bin new_document -- secret=<integer> k=<threshold> n=<points>
// ```
fn main() {
    let secret = argument("secret")
        .parse::<BigUint>()
        .unwrap_or_else(|e| exit(&format!("secret must be a non-negative integer: {e}")));
    let k = argument("k")
        .parse::<usize>()
        .unwrap_or_else(|e| exit(&format!("k must be a positive integer: {e}")));
    let n = argument("n")
        .parse::<u64>()
        .unwrap_or_else(|e| exit(&format!("n must be a positive integer: {e}")));
    if k == 0 || k as u64 > n {
        exit("k must be between 1 and n");
    }

    let xs: Vec<u64> = (1..=n).collect();
    let shares = split_secret(&secret, k, &xs);
    let document = match Document::from_shares(k, &shares, |_| rand::random_range(2..=36)) {
        Ok(document) => document,
        Err(e) => exit(&format!("Failed to build document: {e}")),
    };

    match document.to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => exit(&format!("Failed to serialize document: {e}")),
    }
}

fn argument(name: &str) -> String {
    let prefix = format!("{name}=");
    std::env::args()
        .find(|arg| arg.starts_with(&prefix))
        .map(|arg| arg.trim_start_matches(&prefix).to_string())
        .unwrap_or_else(|| exit(&format!("{name} argument is required, e.g., {name}=3")))
}

fn exit(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
