#![no_main]

use compressed_ntt::{
    center, center_mul, compressed_ct_ntt, compressed_inv_ct_ntt, is_centered, mod_inv, CompressProfile, NttParams,
    StreamlinedTable,
};
use libfuzzer_sys::fuzz_target;

const Q: i32 = 8_380_417;
const ZETA: i32 = 1753;

fuzz_target!(|data: ([u8; 4], [i32; 256])| {  // profile selector + raw coefficients

    // Build a profile for NTT_N = 256 from the selector bytes (group sizes 1..=3, last absorbs the rest)
    let mut merged = Vec::new();
    let mut left = 8;
    for b in data.0 {
        if left == 0 { break; }
        let m = usize::from(b % 3 + 1).min(left);
        merged.push(m);
        left -= m;
    }
    if left > 0 { merged.push(left); }
    let pad = data.0[0] & 0x80 != 0;

    let params = NttParams::new(Q, 256, 256).unwrap();
    let profile = CompressProfile::new(&merged, 8).unwrap();
    let last = profile.compressed_layers() - 1;
    let omega_inv = mod_inv(center_mul(ZETA, ZETA, Q), Q).unwrap();
    let fwd = StreamlinedTable::ct_negacyclic(&params, 1, ZETA, &profile, pad);
    let inv = StreamlinedTable::inv_ct_negacyclic(
        &params, 1, omega_inv, mod_inv(256, Q).unwrap(), mod_inv(ZETA, Q).unwrap(), &profile, pad,
    ).unwrap();

    // Arbitrary 'fuzzy' coefficients, centered before use
    let poly: Vec<i32> = data.1.iter().map(|&c| center(i64::from(c), Q)).collect();
    let mut x = poly.clone();
    compressed_ct_ntt(&params, &mut x, 0, last, &fwd, &profile);
    assert!(is_centered(&x, Q));
    compressed_inv_ct_ntt(&params, &mut x, 0, last, &inv, &profile);
    assert_eq!(x, poly);
});
