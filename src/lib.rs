//! # Bitrank
//!
//! A succinct bitvector answering `access`, `rank` and `select` queries over
//! a static bit sequence in near-constant time, with sublinear auxiliary
//! space.
//!
//! The structure packs the bits into 64-bit words and maintains a two-level
//! rank directory (4096-bit superblocks holding cumulative counts for their
//! eight 512-bit blocks in 128 bits of metadata) plus a sparse select cache
//! that maps every 8192nd occurrence of each bit value to its superblock.
//! Rank resolves with a handful of popcounts; select binary-searches a
//! cache-bounded superblock range and then scans at most one block.
//!
//! ## Quick Start
//!
//! ```
//! use bitrank::{BitVec, RankSelect};
//!
//! // Build from a 0/1 character string (other characters are skipped)
//! let bv = BitVec::from_bits_text("0110100110010110");
//!
//! // rank1(i): 1-bits strictly before position i
//! assert_eq!(bv.rank1(8), 4);
//!
//! // select1(k): position of the k-th 1-bit (1-indexed)
//! assert_eq!(bv.select1(4), 7);
//!
//! // access(i): the bit at position i
//! assert_eq!(bv.access(0), 0);
//! ```
//!
//! ## Features
//!
//! - `std` (default) - Standard library support
//! - `cli` - The `bitrank` command-line driver
//! - `portable-popcount` - Portable bitwise popcount (no intrinsics)

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

mod bitvec;
mod broadword;
mod popcount;
mod rank;
mod select;

pub use bitvec::BitVec;
pub use broadword::select_in_word;
pub use popcount::{popcount_word, popcount_words};
pub use rank::RankDirectory;
pub use select::SelectCache;

/// Trait for rank/select operations on bitvectors.
///
/// - `rank(i, b)`: count of bits equal to `b` in positions `[0, i)`
/// - `select(k, b)`: 0-based position of the k-th (1-indexed) bit equal to `b`
pub trait RankSelect {
    /// Count 1-bits in positions `[0, i)`.
    ///
    /// Returns 0 if `i == 0`. Positions past the end are clamped (see
    /// [`BitVec::rank1`] for the exact contract).
    fn rank1(&self, i: u64) -> u64;

    /// Count 0-bits in positions `[0, i)`.
    fn rank0(&self, i: u64) -> u64 {
        i - self.rank1(i)
    }

    /// Position of the k-th 1-bit, 1-indexed. `select1(0)` is the sentinel 0.
    fn select1(&self, k: u64) -> u64;

    /// Position of the k-th 0-bit, 1-indexed. `select0(0)` is the sentinel 0.
    fn select0(&self, k: u64) -> u64;

    /// Dispatch on the bit value: `rank1` for `true`, `rank0` for `false`.
    #[inline]
    fn rank(&self, i: u64, bit: bool) -> u64 {
        if bit { self.rank1(i) } else { self.rank0(i) }
    }

    /// Dispatch on the bit value: `select1` for `true`, `select0` for `false`.
    #[inline]
    fn select(&self, k: u64, bit: bool) -> u64 {
        if bit { self.select1(k) } else { self.select0(k) }
    }
}

/// Configuration for building the auxiliary indices.
///
/// The defaults match the production layout; tests shrink them to exercise
/// boundary behavior (cache brackets, the L0 region split) on small inputs.
#[derive(Clone, Debug)]
pub struct Config {
    /// Select cache density: every `select_sample`-th occurrence of each bit
    /// value records its superblock (default: 8192).
    pub select_sample: u64,
    /// Length of the first L0 region in superblocks (default: 2^31).
    /// Superblocks past this boundary store their cumulative count relative
    /// to the region start, with the absolute split recorded once.
    pub superblocks_per_l0: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            select_sample: 8192,
            superblocks_per_l0: 1 << 31,
        }
    }
}
