use sha2::{Digest, Sha512};

/// Symbols used by the fingerprint. Vowels other than `E` and glyphs that are
/// easily confused in print (`I`, `O`, `U`, `A`) are left out.
pub const FINGERPRINT_ALPHABET: &[u8; 32] = b"BCDEFGHJKLMNPQRSTVWXYZ1234567890";

pub const FINGERPRINT_LEN: usize = 5;

/// Short, print-friendly fingerprint of `text`: the first four bytes of its
/// SHA-512 digest, base-32 encoded MSB first and cut to five symbols.
pub fn fingerprint(text: &str) -> String {
    fingerprint_parts(&[text])
}

/// Fingerprint of the concatenation of `parts`.
pub fn fingerprint_parts(parts: &[&str]) -> String {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    let mut out = encode_base32(&digest[..4]);
    out.truncate(FINGERPRINT_LEN);
    out
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for byte in bytes {
        buffer = (buffer << 8) | *byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            let index = ((buffer >> bits) & 0x1f) as usize;
            out.push(FINGERPRINT_ALPHABET[index] as char);
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        let index = ((buffer << (5 - bits)) & 0x1f) as usize;
        out.push(FINGERPRINT_ALPHABET[index] as char);
    }
    out
}
