//! Identifier generation for seats, services and expenses

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Generate a fresh identifier of the form `id_<unix-millis>_<base36 suffix>`
pub fn generate_unique_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("id_{}_{}", Utc::now().timestamp_millis(), suffix)
}
