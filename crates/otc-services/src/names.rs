//! Random resource names

use rand::Rng;
use rand::distributions::Alphanumeric;

/// `prefix` followed by `len` random lowercase alphanumerics
pub fn random_name(len: usize, prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}", prefix, suffix)
}
