//! Lookup of precompiled language payloads.
//!
//! The crate ships no pattern data of its own; consumers register the
//! serialized payloads their application bundles and the catalog
//! resolves language tags to resource names of the form
//! `<prefix>.Data.<tag>.bin`.

use std::collections::HashMap;

use crate::automaton::Automaton;
use crate::serial;
use crate::Error;

/// Languages with a known precompiled pattern payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// British English.
    EnGb,
    /// American English.
    EnUs,
}

impl Language {
    /// Every known language, in tag order.
    pub const ALL: [Language; 2] = [Language::EnGb, Language::EnUs];

    /// The BCP-47-style tag, e.g. `en-gb`.
    pub fn tag(self) -> &'static str {
        match self {
            Language::EnGb => "en-gb",
            Language::EnUs => "en-us",
        }
    }

    /// Parse a tag back into a language.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.tag() == tag)
    }

    /// Resource name of this language's payload inside an asset bundle
    /// with the given prefix.
    pub fn resource_name(self, prefix: &str) -> String {
        format!("{prefix}.Data.{}.bin", self.tag())
    }
}

/// A catalog of serialized automata keyed by resource name.
pub struct AssetCatalog {
    prefix: String,
    assets: HashMap<String, Vec<u8>>,
}

impl AssetCatalog {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            assets: HashMap::new(),
        }
    }

    /// Register the payload bytes for `language` under its canonical
    /// resource name.
    pub fn register(&mut self, language: Language, payload: Vec<u8>) {
        self.assets
            .insert(language.resource_name(&self.prefix), payload);
    }

    /// Decode the automaton registered for `language`.
    pub fn load(&self, language: Language) -> Result<Automaton, Error> {
        let name = language.resource_name(&self.prefix);
        let Some(bytes) = self.assets.get(&name) else {
            return Err(Error::MissingResource {
                requested: name,
                available: self.available(),
            });
        };
        log::debug!("loading {} ({} bytes)", language.tag(), bytes.len());
        serial::read(bytes.as_slice())
    }

    /// Decode the automaton for a raw tag such as `en-gb`.
    ///
    /// Tags outside the known set fail with a diagnostic that lists
    /// what the catalog holds.
    pub fn load_tag(&self, tag: &str) -> Result<Automaton, Error> {
        match Language::from_tag(tag) {
            Some(language) => self.load(language),
            None => Err(Error::MissingResource {
                requested: tag.to_string(),
                available: self.available(),
            }),
        }
    }

    fn available(&self) -> String {
        let mut names: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        names.sort_unstable();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }
}
