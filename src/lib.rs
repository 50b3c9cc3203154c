#![no_std]
#![deny(clippy::pedantic, warnings, missing_docs, unsafe_code)]
// Almost all of the 'allow' category...
#![deny(absolute_paths_not_starting_with_crate, dead_code)]
#![deny(elided_lifetimes_in_paths, explicit_outlives_requirements, keyword_idents)]
#![deny(let_underscore_drop, macro_use_extern_crate, meta_variable_misuse, missing_abi)]
#![deny(non_ascii_idents, rust_2021_incompatible_closure_captures)]
#![deny(rust_2021_incompatible_or_patterns, rust_2021_prefixes_incompatible_syntax)]
#![deny(rust_2021_prelude_collisions, single_use_lifetimes, trivial_casts)]
#![deny(trivial_numeric_casts, unreachable_pub, unsafe_op_in_unsafe_fn, unstable_features)]
#![deny(unused_extern_crates, unused_import_braces, unused_lifetimes, unused_macro_rules)]
#![deny(unused_qualifications, unused_results, variant_size_differences)]
//
#![doc = include_str!("../README.md")]


// Implements twiddle-factor table generation and compressed (layer-merged) Cooley-Tukey NTTs
// over centered residues modulo an odd prime Q, for the ring y^NTT_N ∓ 1 with y = x^{ARRAY_N/NTT_N}.

// Functionality map
//
// Configuration object NttParams (Q, NTT_N, LOGNTT_N, ARRAY_N)       --> types.rs
// Layer grouping CompressProfile, table kinds                        --> types.rs
// centeredMul, modExp, modular inverse, bitReverse                   --> helpers.rs
// gen_CT_table / gen_CT_negacyclic_table / gen_inv_CT_table          --> tables.rs
// gen_twist_table / gen_mul_table / gen_all_mul_table                --> tables.rs
// gen_streamlined_{CT, CT_negacyclic, inv_CT, inv_CT_negacyclic}     --> tables.rs
// CT_butterfly                                                       --> ntt.rs
// _m_layer_CT_butterfly / _m_layer_inv_CT_butterfly                  --> ntt.rs
// compressed_CT_NTT / compressed_inv_CT_NTT                          --> ntt.rs
// Single-layer reference transforms and twist application           --> ntt.rs

// Note that assert! statements enforce build-time invariants (buffer lengths, profile and table
// agreement, level ranges) and panic on misuse, while debug_assert! statements check internal
// dataflow (centered range after each butterfly) and so are good fuzz targets. The ensure!
// statements validate runtime configuration and return an error rather than panicking.

extern crate alloc;

mod helpers;
mod ntt;
mod tables;
mod types;

pub use crate::helpers::{bit_reverse, center, center_mul, is_centered, mod_exp, mod_inv};
pub use crate::ntt::{
    compressed_ct_ntt, compressed_inv_ct_ntt, ct_butterfly, ct_ntt, inv_ct_ntt, m_layer_ct_butterfly,
    m_layer_inv_ct_butterfly, sub_layers, twist, SubLayer,
};
pub use crate::tables::{
    gen_all_mul_table, gen_ct_negacyclic_table, gen_ct_table, gen_inv_ct_table, gen_mul_table,
    gen_streamlined_ct_negacyclic_table, gen_streamlined_ct_table, gen_streamlined_inv_ct_negacyclic_table,
    gen_streamlined_inv_ct_table, gen_twist_table, streamlined_len, StreamlinedTable,
};
pub use crate::types::{CompressProfile, Direction, NttParams, TableKind};
