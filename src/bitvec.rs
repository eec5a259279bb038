//! Bitvector with rank/select support.
//!
//! `BitVec` owns the packed words and the two auxiliary structures (rank
//! directory, select cache) plus a few cached scalars. Everything is built
//! once; queries never allocate or mutate.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::broadword::select_in_word;
use crate::popcount::{popcount_word, popcount_words};
use crate::rank::{
    BITS_PER_BLOCK, BLOCKS_PER_SUPERBLOCK, RankDirectory, WORDS_PER_BLOCK, WORDS_PER_SUPERBLOCK,
};
use crate::select::SelectCache;
use crate::{Config, RankSelect};

/// A static bitvector with constant-time rank and cache-accelerated select.
///
/// # Memory Layout
///
/// - **words**: raw bits, 64 per word, little-endian within each word
/// - **directory**: 128 bits of metadata per 4096-bit superblock
/// - **select_cache**: one u32 superblock number per 8192 occurrences of
///   each bit value
///
/// Positions and counts are `u64` throughout; the structure addresses up to
/// 2^64 bits.
///
/// # Example
///
/// ```
/// use bitrank::{BitVec, RankSelect};
///
/// let bv = BitVec::from_bits_text("10110");
/// assert_eq!(bv.rank1(3), 2);
/// assert_eq!(bv.select1(3), 3);
/// assert_eq!(bv.select0(1), 1);
/// ```
#[derive(Clone, Debug)]
pub struct BitVec {
    /// Raw bit storage
    words: Vec<u64>,
    /// Number of valid bits
    len: u64,
    /// Total number of 1-bits
    one_count: u64,
    /// Total number of 0-bits
    zero_count: u64,
    /// Position of the last 1-bit, 0 if none
    last_one_pos: u64,
    /// Position of the last 0-bit, 0 if none
    last_zero_pos: u64,
    /// Two-level superblock metadata
    directory: RankDirectory,
    /// Sparse select acceleration
    select_cache: SelectCache,
}

impl BitVec {
    /// Build from a 0/1 character string.
    ///
    /// Every character other than `'0'` and `'1'` is skipped, so line
    /// endings (including a Windows `\r`) and other whitespace are
    /// tolerated. The i-th accepted character becomes bit i.
    pub fn from_bits_text(text: &str) -> Self {
        let mut words = Vec::with_capacity(text.len() / 64 + 1);
        let mut current = 0u64;
        let mut filled = 0u32;
        let mut len = 0u64;

        for &byte in text.as_bytes() {
            let bit = match byte {
                b'0' => 0u64,
                b'1' => 1u64,
                _ => continue,
            };
            current |= bit << filled;
            filled += 1;
            len += 1;
            if filled == 64 {
                words.push(current);
                current = 0;
                filled = 0;
            }
        }
        if filled > 0 {
            words.push(current);
        }

        Self::from_parts(words, len, Config::default())
    }

    /// Build from raw u64 words (little-endian bit order).
    ///
    /// `len` may be less than `words.len() * 64`; excess words are dropped
    /// and unused bits of the final word are cleared.
    ///
    /// # Panics
    ///
    /// Panics if `len > words.len() * 64`.
    pub fn from_words(words: Vec<u64>, len: u64) -> Self {
        Self::with_config(words, len, Config::default())
    }

    /// Build from raw words with custom index parameters.
    pub fn with_config(words: Vec<u64>, len: u64, config: Config) -> Self {
        assert!(
            len <= words.len() as u64 * 64,
            "len {} exceeds capacity {}",
            len,
            words.len() as u64 * 64
        );
        Self::from_parts(words, len, config)
    }

    fn from_parts(mut words: Vec<u64>, len: u64, config: Config) -> Self {
        words.truncate(len.div_ceil(64) as usize);
        let partial = (len % 64) as u32;
        if partial != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << partial) - 1;
            }
        }

        let one_count = popcount_words(&words);
        let mut last_one_pos = 0u64;
        let mut last_zero_pos = 0u64;
        for (v, &word) in words.iter().enumerate() {
            if word != 0 {
                last_one_pos = v as u64 * 64 + 63 - u64::from(word.leading_zeros());
            }
            let valid_zeros = if v == words.len() - 1 && partial != 0 {
                !word & ((1u64 << partial) - 1)
            } else {
                !word
            };
            if valid_zeros != 0 {
                last_zero_pos = v as u64 * 64 + 63 - u64::from(valid_zeros.leading_zeros());
            }
        }

        let directory = RankDirectory::build(&words, &config);
        let select_cache = SelectCache::build(&words, len, &config);

        Self {
            words,
            len,
            one_count,
            zero_count: len - one_count,
            last_one_pos,
            last_zero_pos,
            directory,
            select_cache,
        }
    }

    /// Number of bits in the bitvector.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the bitvector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of 1-bits.
    #[inline]
    pub fn count_ones(&self) -> u64 {
        self.one_count
    }

    /// Total number of 0-bits.
    #[inline]
    pub fn count_zeros(&self) -> u64 {
        self.zero_count
    }

    /// The bit at position `i`, as 0 or 1.
    ///
    /// Callers must ensure `i < len()`; out-of-range positions are not part
    /// of the contract (the word lookup panics past the last word).
    #[inline]
    pub fn access(&self, i: u64) -> u64 {
        (self.words[(i >> 6) as usize] >> (i & 63)) & 1
    }

    /// The bit at position `i`, as bool. Same contract as [`access`].
    ///
    /// [`access`]: BitVec::access
    #[inline]
    pub fn get(&self, i: u64) -> bool {
        self.access(i) == 1
    }

    /// The raw word at the given index.
    #[inline]
    pub fn word(&self, idx: usize) -> u64 {
        self.words[idx]
    }

    /// Number of 64-bit words in the bitvector.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// All words as a slice.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Total bits occupied by the instance, counting unused array capacity,
    /// for space benchmarking.
    pub fn size_in_bits(&self) -> u64 {
        // Scalar counters and the L0 snapshot: five 64-bit values
        320 + self.words.capacity() as u64 * 64
            + self.directory.size_in_bits()
            + self.select_cache.size_in_bits()
    }

    /// 1-count strictly before position `i`, for `i < len`.
    fn rank1_at(&self, i: u64) -> u64 {
        let sb = i >> 12;
        let blk = (i >> 9) & 0x7;
        let word = ((i >> 6) & 0x7) as usize;

        let mut sum = self.directory.ones_before(sb) + self.directory.block_prefix(sb, blk);

        let first = (sb * WORDS_PER_SUPERBLOCK + blk * WORDS_PER_BLOCK) as usize;
        for w in 0..word {
            sum += u64::from(popcount_word(self.words[first + w]));
        }
        let mask = (1u64 << (i & 63)) - 1;
        sum + u64::from(popcount_word(self.words[first + word] & mask))
    }

    /// Superblock containing the k-th 1-bit.
    fn locate_superblock_ones(&self, k: u64) -> u64 {
        let dir = &self.directory;
        let count = dir.superblock_count();
        // Resolved without searching when the first superblock already has
        // enough ones, or the last one is the only candidate left.
        if count <= 1 || k <= dir.ones_before(1) {
            return 0;
        }
        if k > dir.ones_before(count - 1) {
            return count - 1;
        }
        let (lo, hi) = self.select_cache.bracket_ones(k, count - 1);
        dir.find_superblock_ones(k, lo, hi)
    }

    /// Superblock containing the k-th 0-bit.
    fn locate_superblock_zeros(&self, k: u64) -> u64 {
        let dir = &self.directory;
        let count = dir.superblock_count();
        if count <= 1 || k <= dir.zeros_before(1) {
            return 0;
        }
        if k > dir.zeros_before(count - 1) {
            return count - 1;
        }
        let (lo, hi) = self.select_cache.bracket_zeros(k, count - 1);
        dir.find_superblock_zeros(k, lo, hi)
    }
}

impl RankSelect for BitVec {
    /// Count 1-bits in positions `[0, i)`.
    ///
    /// `rank1(0)` is 0 and `rank1(len)` is the total 1-count. Positions past
    /// the end are clamped to `len - 1` for compatibility with drivers that
    /// overshoot; treat that case as out of contract.
    fn rank1(&self, i: u64) -> u64 {
        if i == 0 || self.len == 0 {
            return 0;
        }
        if i >= self.len {
            if i == self.len {
                return self.one_count;
            }
            return self.rank1_at(self.len - 1);
        }
        self.rank1_at(i)
    }

    /// Count 0-bits in positions `[0, i)`, with the same clamping as
    /// [`rank1`](Self::rank1).
    fn rank0(&self, i: u64) -> u64 {
        let i = if i > self.len {
            self.len.saturating_sub(1)
        } else {
            i
        };
        i - self.rank1(i)
    }

    /// Position of the k-th 1-bit (1-indexed).
    ///
    /// `select1(0)` returns the sentinel 0. `k` must not exceed
    /// `count_ones()`; overshooting is debug-asserted and returns an
    /// unspecified position in release builds.
    fn select1(&self, k: u64) -> u64 {
        if k == 0 {
            return 0;
        }
        debug_assert!(
            k <= self.one_count,
            "select1({}) exceeds 1-count {}",
            k,
            self.one_count
        );
        if k == self.one_count {
            return self.last_one_pos;
        }

        let sb = self.locate_superblock_ones(k);
        let mut remaining = k - self.directory.ones_before(sb);

        // Block within the superblock: the first block whose cumulative
        // count reaches `remaining`; block 7 by elimination.
        let cum = self.directory.block_cumulative(sb);
        let mut blk = BLOCKS_PER_SUPERBLOCK - 1;
        let mut before = cum[6];
        for (i, &c) in cum.iter().enumerate() {
            if c >= remaining {
                blk = i as u64;
                before = if i == 0 { 0 } else { cum[i - 1] };
                break;
            }
        }
        remaining -= before;

        // Word within the block, bit within the word.
        let first = (sb * WORDS_PER_SUPERBLOCK + blk * WORDS_PER_BLOCK) as usize;
        let end = (first + WORDS_PER_BLOCK as usize).min(self.words.len());
        let mut pos = first as u64 * 64;
        for (w, &word) in self.words[first..end].iter().enumerate() {
            let ones = u64::from(popcount_word(word));
            if remaining > ones {
                remaining -= ones;
                continue;
            }
            pos += w as u64 * 64 + u64::from(select_in_word(word, (remaining - 1) as u32));
            break;
        }
        pos
    }

    /// Position of the k-th 0-bit (1-indexed), mirroring
    /// [`select1`](Self::select1): every stored 1-count is inverted against
    /// the bits it covers.
    fn select0(&self, k: u64) -> u64 {
        if k == 0 {
            return 0;
        }
        debug_assert!(
            k <= self.zero_count,
            "select0({}) exceeds 0-count {}",
            k,
            self.zero_count
        );
        if k == self.zero_count {
            return self.last_zero_pos;
        }

        let sb = self.locate_superblock_zeros(k);
        let mut remaining = k - self.directory.zeros_before(sb);

        let cum = self.directory.block_cumulative(sb);
        let mut blk = BLOCKS_PER_SUPERBLOCK - 1;
        let mut before = (BLOCKS_PER_SUPERBLOCK - 1) * BITS_PER_BLOCK - cum[6];
        for (i, &c) in cum.iter().enumerate() {
            let zeros = (i as u64 + 1) * BITS_PER_BLOCK - c;
            if zeros >= remaining {
                blk = i as u64;
                before = if i == 0 {
                    0
                } else {
                    i as u64 * BITS_PER_BLOCK - cum[i - 1]
                };
                break;
            }
        }
        remaining -= before;

        let first = (sb * WORDS_PER_SUPERBLOCK + blk * WORDS_PER_BLOCK) as usize;
        let end = (first + WORDS_PER_BLOCK as usize).min(self.words.len());
        let mut pos = first as u64 * 64;
        for (w, &word) in self.words[first..end].iter().enumerate() {
            let inverted = !word;
            let zeros = u64::from(popcount_word(inverted));
            if remaining > zeros {
                remaining -= zeros;
                continue;
            }
            pos += w as u64 * 64 + u64::from(select_in_word(inverted, (remaining - 1) as u32));
            break;
        }
        pos
    }
}
