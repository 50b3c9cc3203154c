use crate::helpers::ensure;
use alloc::vec::Vec;


/// The fixed configuration shared by every table generation and transform call: the modulus
/// `Q`, the transform size `NTT_N` (and its logarithm), and the total coefficient count
/// `ARRAY_N`. Construct once and pass by reference; the value never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NttParams {
    q: i32,
    ntt_n: usize,
    log_ntt_n: usize,
    array_n: usize,
}


impl NttParams {
    /// Validates and builds a configuration.
    ///
    /// **Input**: odd modulus `3 <= q < 2^30`, transform size `ntt_n` (a power of two, at least 2),
    /// coefficient count `array_n = ntt_n * 2^d` for some `d >= 0`. <br>
    /// **Output**: the configuration object.
    ///
    /// # Errors
    /// Returns an error when any of the above constraints is not met.
    pub fn new(q: i32, ntt_n: usize, array_n: usize) -> Result<Self, &'static str> {
        ensure!((q & 1) == 1, "NttParams: q must be odd");
        ensure!((3..(1 << 30)).contains(&q), "NttParams: q out of range");
        ensure!(ntt_n.is_power_of_two() & (ntt_n >= 2), "NttParams: ntt_n must be a power of two");
        ensure!(array_n.is_power_of_two(), "NttParams: array_n must be a power of two");
        ensure!(array_n >= ntt_n, "NttParams: array_n smaller than ntt_n");
        Ok(Self { q, ntt_n, log_ntt_n: ntt_n.ilog2() as usize, array_n })
    }

    /// The modulus `Q`.
    #[must_use]
    pub const fn q(&self) -> i32 { self.q }

    /// The transform size `NTT_N`.
    #[must_use]
    pub const fn ntt_n(&self) -> usize { self.ntt_n }

    /// `LOGNTT_N = log2(NTT_N)`, the number of radix-2 layers of a full transform.
    #[must_use]
    pub const fn log_ntt_n(&self) -> usize { self.log_ntt_n }

    /// The total coefficient count `ARRAY_N`.
    #[must_use]
    pub const fn array_n(&self) -> usize { self.array_n }

    /// `ARRAY_N / NTT_N`: the number of consecutive coefficients sharing one power of `y`.
    #[must_use]
    pub const fn block_len(&self) -> usize { self.array_n >> self.log_ntt_n }
}


/// Partitions the `LOGNTT_N` butterfly layers of a full transform into contiguous groups, each
/// executed as one fused multi-layer pass. Group `i` spans `merged_layers()[i]` layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressProfile {
    merged_layers: Vec<usize>,
}


impl CompressProfile {
    /// Builds a profile from its group sizes.
    ///
    /// # Errors
    /// Returns an error when the profile is empty, contains an empty group, or its group sizes do
    /// not sum to `log_ntt_n`.
    pub fn new(merged_layers: &[usize], log_ntt_n: usize) -> Result<Self, &'static str> {
        ensure!(!merged_layers.is_empty(), "CompressProfile: no groups");
        ensure!(merged_layers.iter().all(|&m| m > 0), "CompressProfile: empty group");
        ensure!(
            merged_layers.iter().sum::<usize>() == log_ntt_n,
            "CompressProfile: groups do not cover every layer"
        );
        Ok(Self { merged_layers: merged_layers.to_vec() })
    }

    /// The unmerged profile: one group per layer.
    #[must_use]
    pub fn single_layers(log_ntt_n: usize) -> Self {
        assert!(log_ntt_n > 0, "CompressProfile: no layers");
        Self { merged_layers: alloc::vec![1; log_ntt_n] }
    }

    /// The group sizes.
    #[must_use]
    pub fn merged_layers(&self) -> &[usize] { &self.merged_layers }

    /// The number of groups.
    #[must_use]
    pub fn compressed_layers(&self) -> usize { self.merged_layers.len() }

    /// The bit-level at which `group` begins, i.e. `merged_layers[0] + ... + merged_layers[group - 1]`.
    #[must_use]
    pub fn start_level(&self, group: usize) -> usize { self.merged_layers[..group].iter().sum() }
}


/// Selects the layout of a plain twiddle table, and thereby how a level's twiddles are located
/// within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// Forward transform over `y^NTT_N - 1`; `NTT_N/2` bit-reversed powers shared by every level.
    Cyclic,
    /// Forward transform over `y^NTT_N + 1`; level `i` starts at offset `2^i - 1`.
    Negacyclic,
    /// Inverse transform; level `i` holds `2^i` consecutive powers starting at offset `2^i - 1`.
    Inverse,
}


impl TableKind {
    /// Length of the plain table of this kind.
    #[must_use]
    pub const fn plain_len(self, params: &NttParams) -> usize {
        match self {
            TableKind::Cyclic => params.ntt_n >> 1,
            TableKind::Negacyclic => params.ntt_n,
            TableKind::Inverse => params.ntt_n - 1,
        }
    }

    /// Offset of the twiddles of `level` within a plain table of this kind.
    #[must_use]
    pub const fn level_offset(self, level: usize) -> usize {
        match self {
            TableKind::Cyclic => 0,
            TableKind::Negacyclic | TableKind::Inverse => (1 << level) - 1,
        }
    }
}


/// Direction of the butterfly network a streamlined table is laid out for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Forward network: natural-order input, bit-reversed output, butterflies narrow.
    Forward,
    /// Inverse network: bit-reversed input, natural-order output, butterflies widen.
    Inverse,
}
