use tracing::debug;

/// Legacy password digest kept for compatibility with existing user blobs.
///
/// This is a 32-bit rolling checksum over UTF-16 code units, `h = h * 31 + unit`
/// with two's-complement wraparound, rendered as `hash_<base36(|h|)>`.
/// It is NOT a cryptographic hash and provides no protection for the password.
pub fn digest_password(plain: &str) -> String {
    let h = plain.encode_utf16().fold(0i32, |h, unit| {
        (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    debug!(len = plain.len(), "password digested");
    format!("hash_{}", to_base36(h.unsigned_abs()))
}

pub fn verify_password(plain: &str, digest: &str) -> bool {
    digest_password(plain) == digest
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
