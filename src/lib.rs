//! # liang
//!
//! Knuth-Liang hyphenation in pure Rust: a pattern compiler, a packed
//! trie automaton and the lookup engine that drives them.
//!
//! ## Features
//!
//! - 🦀 Pure Rust - no C dependencies
//! - 📦 Compile TeX-style pattern sets and exception lists into a
//!   compact double-array automaton
//! - 💾 Serialize the automaton to a gzip-framed binary payload and
//!   load it back without recompiling
//! - 🧵 Immutable after build - hyphenate from many threads at once
//! - 🎯 Small API - build, hyphenate, save, load
//!
//! ## Example
//!
//! ```
//! use liang::Hyphenator;
//!
//! # fn main() -> Result<(), liang::Error> {
//! let hyphenator = Hyphenator::builder()
//!     .patterns(["hy3ph", "he2n", "hena4", "hen5at", "1na", "n2at", "1tio", "2io", "o2n"])?
//!     .exception("ta-ble")?
//!     .build()?;
//!
//! assert_eq!(hyphenator.hyphenate_with("hyphenation", "-"), "hy-phen-ation");
//! assert_eq!(hyphenator.hyphenate_with("table", "-"), "ta-ble");
//! # Ok(())
//! # }
//! ```
//!
//! ## How it works
//!
//! A Liang pattern such as `hen5at` interleaves characters with digit
//! priorities; when a word is scanned, every pattern matching any
//! substring of the dot-bracketed word contributes its priorities to a
//! per-slot maximum, and slots ending up odd permit a break. Pattern
//! sets are compiled into a suffix-compressed trie packed into a flat
//! array, so a query-time transition is one indexed read plus a
//! character check.

use std::io::{Read, Write};

use rayon::prelude::*;

pub mod automaton;
pub mod engine;
pub mod loader;
pub mod pattern;
pub mod serial;

mod alphabet;
mod compress;
mod invariants;
mod packer;
mod trie;

pub use automaton::Automaton;
pub use engine::CaseFolding;
pub use loader::{AssetCatalog, Language};

use trie::InsertionTrie;

/// Builds a [`Hyphenator`] from pattern strings and exception words.
///
/// The builder owns the mutable insertion trie; [`build`] consumes it,
/// compresses shared suffixes, packs the result and hands back the
/// immutable query-phase object.
///
/// [`build`]: HyphenatorBuilder::build
pub struct HyphenatorBuilder {
    trie: InsertionTrie,
    folding: CaseFolding,
}

impl HyphenatorBuilder {
    fn new() -> Self {
        Self {
            trie: InsertionTrie::new(),
            folding: CaseFolding::default(),
        }
    }

    /// Add one Liang pattern, e.g. `.hy3p`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPattern`] for characters outside the
    /// Basic Multilingual Plane or patterns longer than
    /// [`pattern::MAX_PATTERN_CHARS`].
    pub fn pattern(mut self, pattern: &str) -> Result<Self, Error> {
        let parsed = pattern::parse(pattern)?;
        self.trie.insert(&parsed);
        Ok(self)
    }

    /// Add every pattern from an iterator.
    pub fn patterns<I, S>(mut self, patterns: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self = self.pattern(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add one exception word written with hyphens at its permitted
    /// breaks, e.g. `uni-ver-sity`.
    ///
    /// Exceptions are rewritten to boundary-anchored patterns with
    /// priorities 9 (break) and 8 (no break), which outrank every
    /// priority an ordinary pattern can carry.
    pub fn exception(self, word: &str) -> Result<Self, Error> {
        let rewritten = pattern::rewrite_exception(word);
        self.pattern(&rewritten)
    }

    /// Add every exception from an iterator.
    pub fn exceptions<I, S>(mut self, words: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self = self.exception(word.as_ref())?;
        }
        Ok(self)
    }

    /// Select the case folding applied to query words. Defaults to
    /// [`CaseFolding::Ascii`], matching lowercase ASCII pattern data.
    pub fn case_folding(mut self, folding: CaseFolding) -> Self {
        self.folding = folding;
        self
    }

    /// Compress, pack and freeze the pattern set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOverflow`] if the compressed trie needs
    /// more states than the packed entry format can address.
    pub fn build(mut self) -> Result<Hyphenator, Error> {
        let root = compress::compress(&mut self.trie);
        log::debug!(
            "compressed {} insertion nodes into {} canonical nodes",
            self.trie.len(),
            compress::canonical_count(&self.trie, root)
        );
        let alphabet = alphabet::collect(&self.trie, root);
        let automaton = packer::pack(&self.trie, root, &alphabet)?;
        Ok(Hyphenator {
            automaton,
            folding: self.folding,
        })
    }
}

/// Main interface for computing hyphenation points.
///
/// A `Hyphenator` wraps an immutable packed [`Automaton`] together with
/// the case-folding policy used at query time. Once constructed it is
/// safe to share across threads; all query methods take `&self`.
///
/// # Example
///
/// ```
/// use liang::Hyphenator;
///
/// # fn main() -> Result<(), liang::Error> {
/// let hyphenator = Hyphenator::builder().pattern(".hy3p")?.build()?;
/// assert_eq!(hyphenator.hyphenation_points("hyphenation"), vec![1]);
/// # Ok(())
/// # }
/// ```
pub struct Hyphenator {
    automaton: Automaton,
    folding: CaseFolding,
}

impl Hyphenator {
    /// Start building a hyphenator from patterns and exceptions.
    pub fn builder() -> HyphenatorBuilder {
        HyphenatorBuilder::new()
    }

    /// Wrap an already-built automaton with the default case folding.
    pub fn from_automaton(automaton: Automaton) -> Self {
        Self {
            automaton,
            folding: CaseFolding::default(),
        }
    }

    /// Load a serialized automaton from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadMagic`], [`Error::BadVersion`] or
    /// [`Error::InvalidData`] for payloads that fail validation, and
    /// [`Error::Io`] for stream failures.
    #[must_use = "from_reader returns a Result that must be handled"]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(Self::from_automaton(serial::read(reader)?))
    }

    /// Load a serialized automaton from an in-memory payload, such as
    /// an `include_bytes!` asset.
    #[must_use = "from_bytes returns a Result that must be handled"]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_reader(bytes)
    }

    /// Serialize the automaton into a writer.
    #[must_use = "write_to returns a Result that must be handled"]
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), Error> {
        serial::write(&self.automaton, writer)
    }

    /// Serialize the automaton into a byte buffer.
    #[must_use = "to_bytes returns a Result that must be handled"]
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        serial::to_bytes(&self.automaton)
    }

    /// The underlying packed automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The case folding applied to query words.
    pub fn case_folding(&self) -> CaseFolding {
        self.folding
    }

    /// Replace the case-folding policy.
    pub fn set_case_folding(&mut self, folding: CaseFolding) {
        self.folding = folding;
    }

    /// Compute the priority of every inter-letter slot of `word`.
    ///
    /// The result has `max(0, n - 1)` entries for a word of `n` UTF-16
    /// code units; entry `i` is the strongest priority any pattern
    /// asserts for the slot between units `i` and `i + 1`. Odd values
    /// permit hyphenation, even values (including 0) forbid it. This
    /// never fails: a word no pattern matches yields all zeros, and
    /// words shorter than two units yield an empty vector.
    pub fn hyphenate(&self, word: &str) -> Vec<u8> {
        engine::scan(&self.automaton, word, self.folding)
    }

    /// The inter-letter indices at which `word` may be hyphenated.
    pub fn hyphenation_points(&self, word: &str) -> Vec<usize> {
        let levels = self.hyphenate(word);
        let points = engine::points(&levels);
        invariants::assert_points_in_bounds(&points, &levels);
        points
    }

    /// Render `word` with `separator` inserted at every permitted
    /// break, e.g. a soft hyphen `\u{ad}`.
    pub fn hyphenate_with(&self, word: &str, separator: &str) -> String {
        let levels = self.hyphenate(word);
        engine::render(word, &levels, separator)
    }

    /// Hyphenate many words in parallel.
    ///
    /// Output order matches input order. Useful when priming caches or
    /// preprocessing a document's whole vocabulary at once.
    pub fn hyphenate_batch(&self, words: &[&str]) -> Vec<Vec<u8>> {
        words.par_iter().map(|word| self.hyphenate(word)).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pattern contained a character outside the BMP, or was too
    /// long to serialize.
    #[error("malformed pattern: {0}")]
    MalformedPattern(String),

    /// The compressed trie needs more states than the packed entry
    /// format can address.
    #[error("{states} automaton states exceed the packed format's limit of {max}")]
    StateOverflow { states: usize, max: usize },

    /// A serialized payload did not start with the `LHYP` magic.
    #[error("bad magic bytes {found:02X?}; expected 4C 48 59 50")]
    BadMagic { found: [u8; 4] },

    /// A serialized payload carried an unknown format version.
    #[error("unsupported payload version {0}; this build reads version 1")]
    BadVersion(u8),

    /// The loader had no payload for the requested language.
    #[error("no payload for `{requested}`; available: {available}")]
    MissingResource {
        requested: String,
        available: String,
    },

    /// A payload passed header validation but is structurally corrupt.
    #[error("corrupt payload: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
