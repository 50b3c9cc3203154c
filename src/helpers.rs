// Numeric and permutation primitives consumed by the table generator and the butterfly engine.

/// If the condition is not met, return an error message. Borrowed from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($msg);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// Centered reduction: the unique `m′ ≡ m (mod q)` in the range `−q/2 < m′ ≤ q/2`. For the odd
/// moduli used here this range is `[-(q-1)/2, (q-1)/2]`.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)] // result magnitude is at most q/2
pub const fn center(m: i64, q: i32) -> i32 {
    let q = q as i64;
    let t = m.rem_euclid(q);
    if t <= (q / 2) {
        t as i32
    } else {
        (t - q) as i32
    }
}


/// Centered modular multiplication: the unique `r ≡ a·b (mod q)` with `r ∈ (−q/2, q/2]`.
/// With `b = 1` this is the plain centered reduction of `a`.
#[inline]
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn center_mul(a: i32, b: i32, q: i32) -> i32 { center(a as i64 * b as i64, q) }


/// HAC Algorithm 14.76 Right-to-left binary exponentiation mod q. The result is centered.
///
/// # Errors
/// Returns an error when `q` is not an odd modulus of at least 3.
pub fn mod_exp(g: i32, e: usize, q: i32) -> Result<i32, &'static str> {
    ensure!((q & 1 == 1) & (q >= 3), "mod_exp: modulus must be odd and at least 3");
    let mut result = 1;
    let mut s = center(i64::from(g), q);
    let mut e = e;
    while e != 0 {
        if e & 1 != 0 {
            result = center_mul(result, s, q);
        };
        e >>= 1;
        if e != 0 {
            s = center_mul(s, s, q);
        };
    }
    Ok(result)
}


/// Modular inverse via the extended Euclidean algorithm. The result is centered.
///
/// # Errors
/// Returns an error when `q` is not an odd modulus of at least 3, or when `a` shares a factor
/// with `q` (including `a ≡ 0`).
pub fn mod_inv(a: i32, q: i32) -> Result<i32, &'static str> {
    ensure!((q & 1 == 1) & (q >= 3), "mod_inv: modulus must be odd and at least 3");
    let (mut r0, mut r1) = (i64::from(q), i64::from(a).rem_euclid(i64::from(q)));
    let (mut t0, mut t1) = (0i64, 1i64);
    while r1 != 0 {
        let quot = r0 / r1;
        (r0, r1) = (r1, r0 - quot * r1);
        (t0, t1) = (t1, t0 - quot * t1);
    }
    ensure!(r0 == 1, "mod_inv: value is not invertible");
    Ok(center(t0, q))
}


/// In-place bit-reversal permutation of a power-of-two length buffer: the element at index `i`
/// moves to the index whose `log2(len)`-bit representation is that of `i` reversed. Applying it
/// twice restores the original order.
///
/// # Panics
/// Panics when the buffer length is not a power of two.
pub fn bit_reverse(buf: &mut [i32]) {
    assert!(buf.len().is_power_of_two(), "bit_reverse: length must be a power of two");
    let bits = buf.len().ilog2();
    if bits == 0 {
        return;
    }
    for i in 0..buf.len() {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            buf.swap(i, j);
        }
    }
}


/// Ensure every entry lies in the centered range `(−q/2, q/2]`.
#[must_use]
pub fn is_centered(w: &[i32], q: i32) -> bool {
    let half = q / 2;
    w.iter().all(|&e| (e >= -half) & (e <= half))
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand_chacha::rand_core::SeedableRng;

    const Q: i32 = 8_380_417;
    const ZETA: i32 = 1753; // primitive 512-th root of unity mod Q

    #[test]
    fn test_center() {
        assert_eq!(center(8, 17), 8);
        assert_eq!(center(9, 17), -8);
        assert_eq!(center(-9, 17), 8);
        assert_eq!(center(17, 17), 0);
        assert_eq!(center(-8, 17), -8);
        assert_eq!(center(i64::from(Q) * 3 + 5, Q), 5);
    }

    #[test]
    fn test_center_mul_random() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        for _i in 0..10_000 {
            let a = rng.gen_range(-Q / 2..=Q / 2);
            let b = rng.gen_range(-Q / 2..=Q / 2);
            let r = center_mul(a, b, Q);
            assert!(is_centered(&[r], Q));
            assert_eq!((i64::from(a) * i64::from(b) - i64::from(r)).rem_euclid(i64::from(Q)), 0);
        }
    }

    #[test]
    fn test_mod_exp() {
        assert_eq!(mod_exp(4, 2, 17).unwrap(), -1);
        assert_eq!(mod_exp(4, 4, 17).unwrap(), 1);
        assert_eq!(mod_exp(3, 0, 17).unwrap(), 1);
        assert_eq!(mod_exp(ZETA, 256, Q).unwrap(), -1);
        assert_eq!(mod_exp(ZETA, 512, Q).unwrap(), 1);
        assert!(mod_exp(3, 5, 16).is_err());
        assert!(mod_exp(3, 5, 1).is_err());
    }

    #[test]
    fn test_mod_inv() {
        assert_eq!(mod_inv(4, 17).unwrap(), 13 - 17);
        assert_eq!(center_mul(mod_inv(ZETA, Q).unwrap(), ZETA, Q), 1);
        assert_eq!(center_mul(mod_inv(-256, Q).unwrap(), 256, Q), -1);
        assert!(mod_inv(0, 17).is_err());
        assert!(mod_inv(34, 17).is_err());
        assert!(mod_inv(3, 15).is_err());
        assert!(mod_inv(3, 4).is_err());
    }

    #[test]
    fn test_bit_reverse() {
        let mut x = [0, 1, 2, 3, 4, 5, 6, 7];
        bit_reverse(&mut x);
        assert_eq!(x, [0, 4, 2, 6, 1, 5, 3, 7]);
        let mut y = [9];
        bit_reverse(&mut y);
        assert_eq!(y, [9]);
    }

    #[test]
    fn test_bit_reverse_involution() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        for log_len in 0..10 {
            let orig: alloc::vec::Vec<i32> = (0..1 << log_len).map(|_| rng.gen()).collect();
            let mut x = orig.clone();
            bit_reverse(&mut x);
            bit_reverse(&mut x);
            assert_eq!(x, orig);
        }
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_bit_reverse_bad_length() {
        let mut x = [0i32; 6];
        bit_reverse(&mut x);
    }
}
