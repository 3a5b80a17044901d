pub mod password;
pub mod signature;

use rand::RngExt;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 10;

/// Generate a random order code (10 uppercase letters and digits).
pub fn generate_order_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Generate a random session key for anonymous carts.
pub fn generate_session_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Generate a random alphanumeric token, used for ephemeral JWT secrets.
pub fn generate_secure_token(length: usize) -> String {
    use rand::distr::Alphanumeric;
    let rng = rand::rng();
    rng.sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
