// This file implements the centered CT butterfly, the layer-merged butterfly primitives, and the
// compressed forward/inverse drivers that consume streamlined tables. A single-layer engine over
// the plain tables is also provided; it serves as the reference the merged engine must match.
//
// Coefficient arrays hold ARRAY_N centered residues; index t·(ARRAY_N/NTT_N) + s holds the
// sub-coefficient s of y^t.

use crate::helpers::center_mul;
use crate::tables::StreamlinedTable;
use crate::types::{CompressProfile, Direction, NttParams, TableKind};
use core::ops::Range;


/// Centered CT butterfly on `src[a]` and `src[b]`:
/// `(a, b) ↦ (a + b·twiddle, a − b·twiddle)`, each re-centered into `(−q/2, q/2]`.
#[inline]
pub fn ct_butterfly(src: &mut [i32], a: usize, b: usize, twiddle: i32, q: i32) {
    let t = center_mul(src[b], twiddle, q);
    let u = center_mul(src[a] + t, 1, q);
    src[a] = u;
    src[b] = center_mul(u - (t << 1), 1, q);
    debug_assert!(crate::helpers::is_centered(&[src[a], src[b]], q));
}


/// Addressing of one sub-layer within a layer-merged butterfly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubLayer {
    /// The number of twiddle factors of this sub-layer.
    pub twiddle_count: usize,
    /// The number of butterflies sharing the same twiddle factor.
    pub real_count: usize,
    /// Distance between consecutive butterfly sets: with different twiddles (forward) or with
    /// the same twiddle (inverse).
    pub jump: usize,
    /// Distance between the two inputs of a butterfly.
    pub real_step: usize,
    /// Start of this sub-layer's twiddles within the group's table segment.
    pub table_offset: usize,
}


/// Describes each of the `layers` sub-layers of a merged butterfly with base distance `step`.
/// Invariant: `real_count * twiddle_count == 2^(layers - 1)` for every sub-layer.
pub fn sub_layers(layers: usize, step: usize, direction: Direction) -> impl Iterator<Item = SubLayer> {
    (0..layers).map(move |i| {
        let (jump, real_step) = match direction {
            Direction::Forward => (step << (layers - i), step << (layers - 1 - i)),
            Direction::Inverse => (step << (i + 1), step << i),
        };
        SubLayer { twiddle_count: 1 << i, real_count: 1 << (layers - 1 - i), jump, real_step, table_offset: (1 << i) - 1 }
    })
}


/// Fuses `layers` consecutive forward CT layers into one traversal of the window starting at
/// `base` with element distance `step`. `root_table` holds the group's `2^layers - 1` twiddles,
/// sub-layer `i` at offset `2^i - 1`.
pub fn m_layer_ct_butterfly(src: &mut [i32], base: usize, layers: usize, step: usize, root_table: &[i32], q: i32) {
    for sl in sub_layers(layers, step, Direction::Forward) {
        let twiddles = &root_table[sl.table_offset..sl.table_offset + sl.twiddle_count];
        for k in 0..sl.real_count {
            for (j, &tw) in twiddles.iter().enumerate() {
                let a = base + j * sl.jump + k * step;
                ct_butterfly(src, a, a + sl.real_step, tw, q);
            }
        }
    }
}


/// Inverse counterpart of [`m_layer_ct_butterfly`]: butterflies widen from `step` to
/// `step·2^(layers-1)` as the sub-layers progress.
pub fn m_layer_inv_ct_butterfly(src: &mut [i32], base: usize, layers: usize, step: usize, root_table: &[i32], q: i32) {
    for sl in sub_layers(layers, step, Direction::Inverse) {
        let twiddles = &root_table[sl.table_offset..sl.table_offset + sl.twiddle_count];
        for k in 0..sl.real_count {
            for (j, &tw) in twiddles.iter().enumerate() {
                let a = base + j * step + k * sl.jump;
                ct_butterfly(src, a, a + sl.real_step, tw, q);
            }
        }
    }
}


fn check_driver_args(
    params: &NttParams, src: &[i32], start_level: usize, end_level: usize, table: &StreamlinedTable,
    profile: &CompressProfile, direction: Direction,
) {
    assert_eq!(src.len(), params.array_n(), "compressed NTT: array length mismatch");
    assert!(table.matches(params), "compressed NTT: table built for another configuration");
    assert_eq!(table.direction(), direction, "compressed NTT: table direction mismatch");
    assert_eq!(table.profile(), profile, "compressed NTT: table built for another profile");
    assert!(start_level <= end_level, "compressed NTT: empty level range");
    assert!(end_level < profile.compressed_layers(), "compressed NTT: level out of range");
}


/// Computes the compressed NTT with multi-layer CT butterflies, applying merged groups
/// `start_level..=end_level` of `profile`, i.e. bit-levels
/// `merged_layers[0] + ... + merged_layers[start_level - 1]` through
/// `merged_layers[0] + ... + merged_layers[end_level] - 1`. Stopping early yields an
/// incomplete transform; a later call may resume from `end_level + 1`.
///
/// # Panics
/// Panics when the array length, table configuration, direction, profile or level range is
/// inconsistent.
pub fn compressed_ct_ntt(
    params: &NttParams, src: &mut [i32], start_level: usize, end_level: usize, table: &StreamlinedTable,
    profile: &CompressProfile,
) {
    check_driver_args(params, src, start_level, end_level, table, profile, Direction::Forward);
    let q = params.q();
    let mut level = profile.start_level(start_level);
    for group in start_level..=end_level {
        let m = profile.merged_layers()[group];

        // minimum distance between coefficients in current multi-layer CT butterflies
        let step = params.array_n() >> (level + m);

        // iterate through different sets of twiddle factors
        for count in 0..(1 << level) {
            let offset = count * (params.array_n() >> level);
            let root_table = table.twiddles(group, count);

            // this loop supports incomplete splitting
            for i in 0..step {
                m_layer_ct_butterfly(src, offset + i, m, step, root_table, q);
            }
        }
        level += m;
    }
}


/// Computes the compressed inverse NTT with multi-layer inverse CT butterflies over merged groups
/// `start_level..=end_level`. When `table` carries twist entries and the last group of the
/// profile is applied, every coefficient touched by a final-group butterfly is multiplied by
/// its twist entry in the same pass.
///
/// # Panics
/// Panics when the array length, table configuration, direction, profile or level range is
/// inconsistent.
pub fn compressed_inv_ct_ntt(
    params: &NttParams, src: &mut [i32], start_level: usize, end_level: usize, table: &StreamlinedTable,
    profile: &CompressProfile,
) {
    check_driver_args(params, src, start_level, end_level, table, profile, Direction::Inverse);
    let q = params.q();
    let block = params.block_len();
    let mut level = profile.start_level(start_level);
    for group in start_level..=end_level {
        let m = profile.merged_layers()[group];
        let apply_twist = table.is_twisted() & (group + 1 == profile.compressed_layers());

        // minimum distance between coefficients in current multi-layer CT butterflies
        let step = block << level;

        // iterate through different sets of twiddle factors
        for count in 0..(1 << level) {
            let root_table = table.twiddles(group, count);
            let mut offset = count * block;

            // incomplete splitting: butterflies sharing these twiddles, then sub-coefficients
            for _i in 0..(params.ntt_n() >> (m + level)) {
                for j in 0..block {
                    m_layer_inv_ct_butterfly(src, offset + j, m, step, root_table, q);
                    if apply_twist {
                        let twists = &root_table[(1 << m) - 1..];
                        for (t, &tw) in twists.iter().enumerate() {
                            let idx = offset + j + t * step;
                            src[idx] = center_mul(src[idx], tw, q);
                        }
                    }
                }
                offset += block << (m + level);
            }
        }
        level += m;
    }
}


/// Single-layer forward CT NTT over the plain table of `kind` (cyclic or negacyclic), applying
/// bit-levels `levels` one radix-2 layer per pass.
///
/// # Panics
/// Panics for an inverse table kind, on length mismatches, or when `levels` exceeds `LOGNTT_N`.
pub fn ct_ntt(params: &NttParams, src: &mut [i32], levels: Range<usize>, table: &[i32], kind: TableKind) {
    assert_ne!(kind, TableKind::Inverse, "ct_ntt: inverse table supplied");
    assert_eq!(src.len(), params.array_n(), "ct_ntt: array length mismatch");
    assert_eq!(table.len(), kind.plain_len(params), "ct_ntt: table length mismatch");
    assert!(levels.end <= params.log_ntt_n(), "ct_ntt: level out of range");
    for level in levels {
        let len = params.array_n() >> (level + 1);
        let twiddles = &table[kind.level_offset(level)..kind.level_offset(level) + (1 << level)];
        for (j, &zeta) in twiddles.iter().enumerate() {
            let start = j * 2 * len;
            for i in start..(start + len) {
                ct_butterfly(src, i, i + len, zeta, params.q());
            }
        }
    }
}


/// Single-layer inverse CT NTT over the plain inverse table, applying bit-levels `levels`.
///
/// # Panics
/// Panics on length mismatches or when `levels` exceeds `LOGNTT_N`.
pub fn inv_ct_ntt(params: &NttParams, src: &mut [i32], levels: Range<usize>, table: &[i32]) {
    assert_eq!(src.len(), params.array_n(), "inv_ct_ntt: array length mismatch");
    assert_eq!(table.len(), TableKind::Inverse.plain_len(params), "inv_ct_ntt: table length mismatch");
    assert!(levels.end <= params.log_ntt_n(), "inv_ct_ntt: level out of range");
    let block = params.block_len();
    for level in levels {
        let len = block << level;
        let twiddles = &table[TableKind::Inverse.level_offset(level)..];
        let mut start = 0;
        while start < params.array_n() {
            for i in 0..len {
                ct_butterfly(src, start + i, start + i + len, twiddles[i / block], params.q());
            }
            start += 2 * len;
        }
    }
}


/// Multiplies every sub-coefficient of `y^t` by `twist_table[t]`, folding
/// `y^NTT_N - ω^NTT_N` onto `y^NTT_N - 1` for a table from [`crate::gen_twist_table`].
///
/// # Panics
/// Panics on length mismatches.
pub fn twist(params: &NttParams, src: &mut [i32], twist_table: &[i32]) {
    assert_eq!(src.len(), params.array_n(), "twist: array length mismatch");
    assert_eq!(twist_table.len(), params.ntt_n(), "twist: table length mismatch");
    for (chunk, &tw) in src.chunks_exact_mut(params.block_len()).zip(twist_table) {
        for c in chunk.iter_mut() {
            *c = center_mul(*c, tw, params.q());
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{is_centered, mod_exp, mod_inv};
    use crate::tables::{gen_ct_negacyclic_table, gen_ct_table, gen_inv_ct_table, gen_twist_table};
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::Rng;
    use rand_chacha::rand_core::SeedableRng;

    const Q: i32 = 8_380_417;
    const ZETA: i32 = 1753; // primitive 512-th root of unity mod Q

    #[test]
    fn test_butterfly() {
        let mut x = [3, 5];
        ct_butterfly(&mut x, 0, 1, 4, 17); // 5·4 = 20 ≡ 3
        assert_eq!(x, [6, 0]);
        let mut x = [8, 8];
        ct_butterfly(&mut x, 0, 1, 1, 17);
        assert_eq!(x, [-1, 0]);
        let mut x = [-8, 8];
        ct_butterfly(&mut x, 1, 0, -1, 17); // operands swapped: a = 8, b = -8
        assert_eq!(x, [0, -1]);
    }

    #[test]
    fn test_sub_layer_invariant() {
        for layers in 1..=10 {
            for step in [1, 2, 4, 16, 128] {
                for direction in [Direction::Forward, Direction::Inverse] {
                    let subs: Vec<SubLayer> = sub_layers(layers, step, direction).collect();
                    assert_eq!(subs.len(), layers);
                    for (i, sl) in subs.iter().enumerate() {
                        assert_eq!(sl.real_count * sl.twiddle_count, 1 << (layers - 1));
                        assert_eq!(sl.table_offset, (1 << i) - 1);
                        assert_eq!(sl.jump, 2 * sl.real_step);

                        // every element of the 2^layers window is touched exactly once
                        let mut touched = vec![0usize; 1 << layers];
                        for k in 0..sl.real_count {
                            for j in 0..sl.twiddle_count {
                                let a = match direction {
                                    Direction::Forward => j * sl.jump + k * step,
                                    Direction::Inverse => j * step + k * sl.jump,
                                };
                                for idx in [a, a + sl.real_step] {
                                    assert_eq!(idx % step, 0);
                                    touched[idx / step] += 1;
                                }
                            }
                        }
                        assert!(touched.iter().all(|&t| t == 1));
                    }
                }
            }
        }
    }

    #[test]
    fn test_concrete_delta() {
        let p = NttParams::new(17, 4, 4).unwrap();
        let profile = CompressProfile::new(&[1, 1], 2).unwrap();
        let table = StreamlinedTable::ct(&p, 1, 4, &profile, false);
        assert_eq!(table.entries(), &[1, 1, 4]);
        let mut x = [1, 0, 0, 0];
        compressed_ct_ntt(&p, &mut x, 0, 1, &table, &profile);
        assert_eq!(x, [1, 1, 1, 1]);
    }

    #[test]
    fn test_delta_all_profiles() {
        let p = NttParams::new(Q, 256, 256).unwrap();
        for merged in [vec![8], vec![4, 4], vec![3, 2, 3], vec![1, 7], vec![1; 8]] {
            let profile = CompressProfile::new(&merged, 8).unwrap();
            for pad in [false, true] {
                let table = StreamlinedTable::ct_negacyclic(&p, 1, ZETA, &profile, pad);
                let mut x = vec![0i32; 256];
                x[0] = 1;
                compressed_ct_ntt(&p, &mut x, 0, profile.compressed_layers() - 1, &table, &profile);
                assert!(x.iter().all(|&e| e == 1));
            }
        }
    }

    #[test]
    fn test_negacyclic_evaluation() {
        // Output slot k holds a(ψ^{2·brv(k)+1}).
        let p = NttParams::new(Q, 16, 16).unwrap();
        let psi = mod_exp(ZETA, 16, Q).unwrap();
        let profile = CompressProfile::new(&[3, 1], 4).unwrap();
        let table = StreamlinedTable::ct_negacyclic(&p, 1, psi, &profile, false);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let a: Vec<i32> = (0..16).map(|_| rng.gen_range(-Q / 2..=Q / 2)).collect();
        let mut x = a.clone();
        compressed_ct_ntt(&p, &mut x, 0, 1, &table, &profile);
        for (k, &xk) in x.iter().enumerate() {
            let r = (k as u8).reverse_bits() >> 4;
            let point = mod_exp(psi, 2 * usize::from(r) + 1, Q).unwrap();
            let mut acc = 0;
            for &c in a.iter().rev() {
                acc = center_mul(center_mul(acc, point, Q) + c, 1, Q);
            }
            assert_eq!(xk, acc);
        }
    }

    #[test]
    fn test_compressed_matches_single_layer() {
        let p = NttParams::new(Q, 64, 256).unwrap();
        let psi = mod_exp(ZETA, 4, Q).unwrap();
        let omega = center_mul(psi, psi, Q);
        let omega_inv = mod_inv(omega, Q).unwrap();
        let mut neg = vec![0i32; 64];
        gen_ct_negacyclic_table(&p, &mut neg, 1, psi);
        let mut cyc = vec![0i32; 32];
        gen_ct_table(&p, &mut cyc, 1, omega);
        let mut inv = vec![0i32; 63];
        gen_inv_ct_table(&p, &mut inv, 1, omega_inv).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        for merged in [vec![6], vec![2, 4], vec![3, 3], vec![1, 2, 3], vec![1; 6]] {
            let profile = CompressProfile::new(&merged, 6).unwrap();
            let a: Vec<i32> = (0..256).map(|_| rng.gen_range(-Q / 2..=Q / 2)).collect();

            let table = StreamlinedTable::ct_negacyclic(&p, 1, psi, &profile, true);
            let (mut x, mut y) = (a.clone(), a.clone());
            compressed_ct_ntt(&p, &mut x, 0, merged.len() - 1, &table, &profile);
            ct_ntt(&p, &mut y, 0..6, &neg, TableKind::Negacyclic);
            assert_eq!(x, y);

            let table = StreamlinedTable::ct(&p, 1, omega, &profile, false);
            let (mut x, mut y) = (a.clone(), a.clone());
            compressed_ct_ntt(&p, &mut x, 0, merged.len() - 1, &table, &profile);
            ct_ntt(&p, &mut y, 0..6, &cyc, TableKind::Cyclic);
            assert_eq!(x, y);

            let table = StreamlinedTable::inv_ct(&p, 1, omega_inv, &profile, true).unwrap();
            let (mut x, mut y) = (a.clone(), a.clone());
            compressed_inv_ct_ntt(&p, &mut x, 0, merged.len() - 1, &table, &profile);
            inv_ct_ntt(&p, &mut y, 0..6, &inv);
            assert_eq!(x, y);
            assert!(is_centered(&x, Q));
        }
    }

    #[test]
    fn test_incomplete_and_resumed() {
        let p = NttParams::new(Q, 256, 256).unwrap();
        let profile = CompressProfile::new(&[3, 2, 2, 1], 8).unwrap();
        let table = StreamlinedTable::ct_negacyclic(&p, 1, ZETA, &profile, false);
        let mut plain = vec![0i32; 256];
        gen_ct_negacyclic_table(&p, &mut plain, 1, ZETA);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(789);
        let a: Vec<i32> = (0..256).map(|_| rng.gen_range(-Q / 2..=Q / 2)).collect();

        // stop one layer short of full splitting
        let mut x = a.clone();
        compressed_ct_ntt(&p, &mut x, 0, 2, &table, &profile);
        let mut y = a.clone();
        ct_ntt(&p, &mut y, 0..7, &plain, TableKind::Negacyclic);
        assert_eq!(x, y);

        // resume
        compressed_ct_ntt(&p, &mut x, 3, 3, &table, &profile);
        ct_ntt(&p, &mut y, 7..8, &plain, TableKind::Negacyclic);
        assert_eq!(x, y);
    }

    #[test]
    fn test_twist_blocks() {
        let p = NttParams::new(17, 4, 8).unwrap();
        let mut tw = [0i32; 4];
        gen_twist_table(&p, &mut tw, 1, 2);
        let mut x = [1, 1, 1, 1, 1, 1, 1, 1];
        twist(&p, &mut x, &tw);
        assert_eq!(x, [1, 1, 2, 2, 4, 4, 8, 8]);
    }

    #[test]
    #[should_panic(expected = "another profile")]
    fn test_profile_mismatch_panics() {
        let p = NttParams::new(17, 4, 4).unwrap();
        let profile = CompressProfile::new(&[1, 1], 2).unwrap();
        let table = StreamlinedTable::ct(&p, 1, 4, &profile, false);
        let mut x = [1, 0, 0, 0];
        compressed_ct_ntt(&p, &mut x, 0, 0, &table, &CompressProfile::new(&[2], 2).unwrap());
    }

    #[test]
    #[should_panic(expected = "another configuration")]
    fn test_modulus_mismatch_panics() {
        let small = NttParams::new(17, 4, 4).unwrap();
        let profile = CompressProfile::new(&[1, 1], 2).unwrap();
        let table = StreamlinedTable::ct(&small, 1, 4, &profile, false);
        let large = NttParams::new(Q, 4, 4).unwrap();
        let mut x = [1, 0, 0, 0];
        compressed_ct_ntt(&large, &mut x, 0, 1, &table, &profile);
    }

    #[test]
    #[should_panic(expected = "another configuration")]
    fn test_size_mismatch_panics() {
        let p = NttParams::new(17, 4, 8).unwrap();
        let profile = CompressProfile::new(&[1, 1], 2).unwrap();
        let table = StreamlinedTable::inv_ct(&p, 1, 4, &profile, false).unwrap();
        // same modulus and array length, but NTT_N = 8 reads the table as a 3-layer network
        let wide = NttParams::new(17, 8, 8).unwrap();
        let mut x = [1, 0, 0, 0, 0, 0, 0, 0];
        compressed_inv_ct_ntt(&wide, &mut x, 0, 1, &table, &profile);
    }

    #[test]
    #[should_panic(expected = "direction mismatch")]
    fn test_direction_mismatch_panics() {
        let p = NttParams::new(17, 4, 4).unwrap();
        let profile = CompressProfile::new(&[2], 2).unwrap();
        let table = StreamlinedTable::ct(&p, 1, 4, &profile, false);
        let mut x = [1, 0, 0, 0];
        compressed_inv_ct_ntt(&p, &mut x, 0, 0, &table, &profile);
    }
}
