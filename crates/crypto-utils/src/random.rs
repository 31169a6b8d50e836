use rand::RngCore;
use rand_core::OsRng;

/// Fills a fixed-size array from the operating system CSPRNG.
pub fn random_bytes_fixed<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_all_zero() {
        let buf: [u8; 32] = random_bytes_fixed();
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn differ_between_calls() {
        let a: [u8; 12] = random_bytes_fixed();
        let b: [u8; 12] = random_bytes_fixed();
        assert_ne!(a, b);
    }
}
