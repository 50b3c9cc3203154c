// This file implements the twiddle-factor ("root") table generator: plain forward, negacyclic,
// inverse, twist and multiplication tables, plus streamlined layouts re-ordered to match the
// access pattern of the layer-merged butterflies in ntt.rs.
//
// Let y = x^{ARRAY_N / NTT_N}. Every routine writes into a caller-provided buffer of exactly
// the required length, which is asserted. All emitted values are centered residues.

use crate::helpers::{bit_reverse, center_mul, mod_exp};
use crate::types::{CompressProfile, Direction, NttParams, TableKind};
use alloc::vec;
use alloc::vec::Vec;


/// Writes `scale, scale·ω, scale·ω², ...` into `des`.
fn powers(des: &mut [i32], scale: i32, omega: i32, q: i32) {
    let mut factor = center_mul(scale, 1, q);
    for d in des.iter_mut() {
        *d = factor;
        factor = center_mul(factor, omega, q);
    }
}


/// Generates twiddle factors for the forward NTT over `y^NTT_N - 1` with CT butterflies:
/// `NTT_N/2` powers of `omega` (times `scale`) in bit-reversed order. Level `i` of the network
/// uses the first `2^i` entries.
///
/// # Panics
/// Panics when `des.len() != NTT_N/2`.
pub fn gen_ct_table(params: &NttParams, des: &mut [i32], scale: i32, omega: i32) {
    assert_eq!(des.len(), TableKind::Cyclic.plain_len(params), "gen_ct_table: bad length");
    powers(des, scale, omega, params.q());
    bit_reverse(des);
}


/// Generates twiddle factors for the forward NTT over `y^NTT_N + 1` with CT butterflies.
/// The `NTT_N` powers of `omega` (a primitive `2·NTT_N`-th root) are bit-reversed and then
/// shifted left by one position, dropping the unused leading entry, so that level `i` starts
/// at offset `2^i - 1`. The trailing slot keeps its value and is never consumed.
///
/// # Panics
/// Panics when `des.len() != NTT_N`.
pub fn gen_ct_negacyclic_table(params: &NttParams, des: &mut [i32], scale: i32, omega: i32) {
    assert_eq!(des.len(), TableKind::Negacyclic.plain_len(params), "gen_ct_negacyclic_table: bad length");
    powers(des, scale, omega, params.q());
    bit_reverse(des);
    des.copy_within(1.., 0);
}


/// Generates twiddle factors for the inverse NTT over `y^NTT_N - 1` with CT butterflies. For
/// each level `i`, the `2^(i+1)`-th root `omega^(NTT_N / 2^(i+1))` is derived and `2^i`
/// consecutive powers of it (times `scale`) are emitted starting at offset `2^i - 1`.
///
/// # Errors
/// Propagates a failure of the modular exponentiation.
///
/// # Panics
/// Panics when `des.len() != NTT_N - 1`.
pub fn gen_inv_ct_table(
    params: &NttParams, des: &mut [i32], scale: i32, omega: i32,
) -> Result<(), &'static str> {
    assert_eq!(des.len(), TableKind::Inverse.plain_len(params), "gen_inv_ct_table: bad length");
    for level in 0..params.log_ntt_n() {
        let zeta = mod_exp(omega, params.ntt_n() >> (level + 1), params.q())?;
        let start = TableKind::Inverse.level_offset(level);
        powers(&mut des[start..start + (1 << level)], scale, zeta, params.q());
    }
    Ok(())
}


/// Generates twiddle factors for twisting `y^NTT_N - omega^NTT_N` to `y^NTT_N - 1`:
/// `NTT_N` consecutive powers of `omega`, multiplied by `scale`.
///
/// # Panics
/// Panics when `des.len() != NTT_N`.
pub fn gen_twist_table(params: &NttParams, des: &mut [i32], scale: i32, omega: i32) {
    assert_eq!(des.len(), params.ntt_n(), "gen_twist_table: bad length");
    powers(des, scale, omega, params.q());
}


/// Generates the constants `ζ_j = scale·omega^{brv(j)}` of the residue rings left after a
/// cyclic transform: output pair `j` lives in `(x^{ARRAY_N/NTT_N} - ζ_j, x^{ARRAY_N/NTT_N} + ζ_j)`.
///
/// # Panics
/// Panics when `des.len() != NTT_N/2`.
pub fn gen_mul_table(params: &NttParams, des: &mut [i32], scale: i32, omega: i32) {
    assert_eq!(des.len(), params.ntt_n() >> 1, "gen_mul_table: bad length");
    powers(des, scale, omega, params.q());
    bit_reverse(des);
}


/// As [`gen_mul_table`], but each constant is followed by its negation, giving one constant per
/// output block of the cyclic transform in output order.
///
/// # Panics
/// Panics when `des.len() != NTT_N`.
pub fn gen_all_mul_table(params: &NttParams, des: &mut [i32], scale: i32, omega: i32) {
    assert_eq!(des.len(), params.ntt_n(), "gen_all_mul_table: bad length");
    let mut tmp = vec![0i32; params.ntt_n() >> 1];
    gen_mul_table(params, &mut tmp, scale, omega);
    for (pair, &t) in des.chunks_exact_mut(2).zip(tmp.iter()) {
        pair[0] = t;
        pair[1] = -t;
    }
}


/// Number of slots one outer repetition of merged group `group` occupies: an optional pad
/// slot, `2^m - 1` twiddles, and for the last group of a twisted layout `2^m` twist entries.
pub(crate) fn rep_len(profile: &CompressProfile, group: usize, pad: bool, twisted: bool) -> usize {
    let m = profile.merged_layers()[group];
    let twist = if twisted & (group + 1 == profile.compressed_layers()) { 1 << m } else { 0 };
    usize::from(pad) + (1 << m) - 1 + twist
}


/// Length of a streamlined table for `profile`, with or without pad slots and twist entries.
///
/// # Panics
/// Panics when the group sizes of `profile` do not sum to `LOGNTT_N`.
#[must_use]
pub fn streamlined_len(params: &NttParams, profile: &CompressProfile, pad: bool, twisted: bool) -> usize {
    assert_eq!(profile.start_level(profile.compressed_layers()), params.log_ntt_n(), "profile mismatch");
    (0..profile.compressed_layers())
        .map(|g| (1 << profile.start_level(g)) * rep_len(profile, g, pad, twisted))
        .sum()
}


// Shared traversal: for merged group i (levels start..start+m), for each of the 2^start outer
// repetitions j, emit an optional zero pad slot, then for every sub-level k the 2^k twiddles
// in the order the merged butterfly consumes them, then (last group only) the twist entries.
fn streamline(
    params: &NttParams, des: &mut [i32], plain: &[i32], kind: TableKind, profile: &CompressProfile,
    pad: bool, twist: Option<&[i32]>,
) {
    assert_eq!(des.len(), streamlined_len(params, profile, pad, twist.is_some()), "streamline: bad length");
    let mut idx = 0;
    let mut start = 0;
    for (i, &m) in profile.merged_layers().iter().enumerate() {
        for j in 0..(1 << start) {
            if pad {
                des[idx] = 0;
                idx += 1;
            }
            for k in 0..m {
                let level = &plain[kind.level_offset(start + k)..];
                for h in 0..(1 << k) {
                    des[idx] = match kind {
                        TableKind::Cyclic | TableKind::Negacyclic => level[j * (1 << k) + h],
                        TableKind::Inverse => level[j + (h << start)],
                    };
                    idx += 1;
                }
            }
            if let Some(tw) = twist.filter(|_| i + 1 == profile.compressed_layers()) {
                for k in 0..(1 << m) {
                    des[idx] = tw[j + k * (params.ntt_n() >> m)];
                    idx += 1;
                }
            }
        }
        start += m;
    }
    debug_assert_eq!(idx, des.len());
}


/// Streamlined variant of [`gen_ct_table`] laid out for `profile`, with one leading zero slot
/// per outer repetition when `pad` is set.
///
/// # Panics
/// Panics when `des.len()` differs from [`streamlined_len`] or the profile does not match.
pub fn gen_streamlined_ct_table(
    params: &NttParams, des: &mut [i32], scale: i32, omega: i32, profile: &CompressProfile, pad: bool,
) {
    let mut tmp = vec![0i32; TableKind::Cyclic.plain_len(params)];
    gen_ct_table(params, &mut tmp, scale, omega);
    streamline(params, des, &tmp, TableKind::Cyclic, profile, pad, None);
}


/// Streamlined variant of [`gen_ct_negacyclic_table`] laid out for `profile`.
///
/// # Panics
/// Panics when `des.len()` differs from [`streamlined_len`] or the profile does not match.
pub fn gen_streamlined_ct_negacyclic_table(
    params: &NttParams, des: &mut [i32], scale: i32, omega: i32, profile: &CompressProfile, pad: bool,
) {
    let mut tmp = vec![0i32; TableKind::Negacyclic.plain_len(params)];
    gen_ct_negacyclic_table(params, &mut tmp, scale, omega);
    streamline(params, des, &tmp, TableKind::Negacyclic, profile, pad, None);
}


/// Streamlined variant of [`gen_inv_ct_table`] laid out for `profile`.
///
/// # Errors
/// Propagates a failure of the modular exponentiation.
///
/// # Panics
/// Panics when `des.len()` differs from [`streamlined_len`] or the profile does not match.
pub fn gen_streamlined_inv_ct_table(
    params: &NttParams, des: &mut [i32], scale: i32, omega: i32, profile: &CompressProfile, pad: bool,
) -> Result<(), &'static str> {
    let mut tmp = vec![0i32; TableKind::Inverse.plain_len(params)];
    gen_inv_ct_table(params, &mut tmp, scale, omega)?;
    streamline(params, des, &tmp, TableKind::Inverse, profile, pad, None);
    Ok(())
}


/// Streamlined inverse table that additionally interleaves, after the twiddles of every outer
/// repetition `j` of the last merged group, the `2^m` twist entries
/// `twist[j + k·(NTT_N >> m)]` built by [`gen_twist_table`] from `scale2` and `twist_omega`.
/// With `twist_omega = ψ^-1` and `scale2 = 1/NTT_N` this completes the negacyclic inverse in
/// the same pass.
///
/// # Errors
/// Propagates a failure of the modular exponentiation.
///
/// # Panics
/// Panics when `des.len()` differs from [`streamlined_len`] or the profile does not match.
#[allow(clippy::too_many_arguments)]
pub fn gen_streamlined_inv_ct_negacyclic_table(
    params: &NttParams, des: &mut [i32], scale1: i32, omega: i32, scale2: i32, twist_omega: i32,
    profile: &CompressProfile, pad: bool,
) -> Result<(), &'static str> {
    let mut tmp = vec![0i32; TableKind::Inverse.plain_len(params)];
    gen_inv_ct_table(params, &mut tmp, scale1, omega)?;
    let mut tmp2 = vec![0i32; params.ntt_n()];
    gen_twist_table(params, &mut tmp2, scale2, twist_omega);
    streamline(params, des, &tmp, TableKind::Inverse, profile, pad, Some(&tmp2));
    Ok(())
}


/// An owned streamlined table together with the layout facts the compressed drivers need to
/// consume it: the modulus and transform size it was generated under, direction, profile, pad
/// slots, interleaved twist entries and group offsets.
/// Immutable once built; share it across any number of transform calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamlinedTable {
    q: i32,
    ntt_n: usize,
    direction: Direction,
    profile: CompressProfile,
    pad: bool,
    twisted: bool,
    group_offsets: Vec<usize>,
    entries: Vec<i32>,
}


impl StreamlinedTable {
    fn alloc(params: &NttParams, direction: Direction, profile: &CompressProfile, pad: bool, twisted: bool) -> Self {
        let mut group_offsets = Vec::with_capacity(profile.compressed_layers());
        let mut offset = 0;
        for g in 0..profile.compressed_layers() {
            group_offsets.push(offset);
            offset += (1 << profile.start_level(g)) * rep_len(profile, g, pad, twisted);
        }
        let entries = vec![0i32; streamlined_len(params, profile, pad, twisted)];
        debug_assert_eq!(offset, entries.len());
        Self {
            q: params.q(),
            ntt_n: params.ntt_n(),
            direction,
            profile: profile.clone(),
            pad,
            twisted,
            group_offsets,
            entries,
        }
    }

    /// Forward cyclic table, see [`gen_streamlined_ct_table`].
    #[must_use]
    pub fn ct(params: &NttParams, scale: i32, omega: i32, profile: &CompressProfile, pad: bool) -> Self {
        let mut table = Self::alloc(params, Direction::Forward, profile, pad, false);
        gen_streamlined_ct_table(params, &mut table.entries, scale, omega, profile, pad);
        table
    }

    /// Forward negacyclic table, see [`gen_streamlined_ct_negacyclic_table`].
    #[must_use]
    pub fn ct_negacyclic(params: &NttParams, scale: i32, omega: i32, profile: &CompressProfile, pad: bool) -> Self {
        let mut table = Self::alloc(params, Direction::Forward, profile, pad, false);
        gen_streamlined_ct_negacyclic_table(params, &mut table.entries, scale, omega, profile, pad);
        table
    }

    /// Inverse table, see [`gen_streamlined_inv_ct_table`].
    ///
    /// # Errors
    /// Propagates a failure of the modular exponentiation.
    pub fn inv_ct(
        params: &NttParams, scale: i32, omega: i32, profile: &CompressProfile, pad: bool,
    ) -> Result<Self, &'static str> {
        let mut table = Self::alloc(params, Direction::Inverse, profile, pad, false);
        gen_streamlined_inv_ct_table(params, &mut table.entries, scale, omega, profile, pad)?;
        Ok(table)
    }

    /// Inverse table with interleaved twist entries, see
    /// [`gen_streamlined_inv_ct_negacyclic_table`].
    ///
    /// # Errors
    /// Propagates a failure of the modular exponentiation.
    pub fn inv_ct_negacyclic(
        params: &NttParams, scale1: i32, omega: i32, scale2: i32, twist_omega: i32, profile: &CompressProfile,
        pad: bool,
    ) -> Result<Self, &'static str> {
        let mut table = Self::alloc(params, Direction::Inverse, profile, pad, true);
        gen_streamlined_inv_ct_negacyclic_table(
            params, &mut table.entries, scale1, omega, scale2, twist_omega, profile, pad,
        )?;
        Ok(table)
    }

    /// The raw layout, pad slots and twist entries included.
    #[must_use]
    pub fn entries(&self) -> &[i32] { &self.entries }

    /// Whether this table was generated under the modulus and transform size of `params`.
    #[must_use]
    pub fn matches(&self, params: &NttParams) -> bool { (self.q == params.q()) & (self.ntt_n == params.ntt_n()) }

    /// The network this table drives.
    #[must_use]
    pub fn direction(&self) -> Direction { self.direction }

    /// The profile this table was laid out for.
    #[must_use]
    pub fn profile(&self) -> &CompressProfile { &self.profile }

    /// Whether every outer repetition starts with a zero pad slot.
    #[must_use]
    pub fn is_padded(&self) -> bool { self.pad }

    /// Whether the last group carries interleaved twist entries.
    #[must_use]
    pub fn is_twisted(&self) -> bool { self.twisted }

    /// The twiddles (pad slot skipped) of outer repetition `rep` of merged group `group`; for the
    /// last group of a twisted table the `2^m` twist entries follow the `2^m - 1` twiddles.
    pub(crate) fn twiddles(&self, group: usize, rep: usize) -> &[i32] {
        let len = rep_len(&self.profile, group, self.pad, self.twisted);
        let start = self.group_offsets[group] + rep * len + usize::from(self.pad);
        &self.entries[start..start + len - usize::from(self.pad)]
    }
}
