//! ICC Profile Tags
//!
//! A [`ProfileTag`] is one element of a profile's tag list: the raw block
//! as found in (or destined for) the profile bytes, its usage and type
//! signatures, and a lazily decoded list of [`TagValue`]s.
//!
//! Tags read from a profile remember their original offset so an
//! unmodified profile can be written back byte for byte.

mod codec;
mod dict;
mod numeric;
pub mod psid;
mod text;

use std::sync::OnceLock;

pub use codec::{CodecRegistry, TagCodec};
pub use dict::DictCodec;
pub use numeric::{CurveCodec, SigCodec, XyzCodec};
pub use psid::PsidCodec;
pub use text::{DescCodec, MlucCodec, TextCodec};

use crate::config::{self, Locale};
use crate::container::{ParentKind, RefContainer};
use crate::error::Result;
use crate::icc::Signature;

/// One decoded value of a tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagValue {
    /// Key for dictionary like tags
    pub key: Option<String>,
    /// `"de_DE"` style locale of localized text
    pub locale: Option<String>,
    pub text: String,
}

impl TagValue {
    /// Plain text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Text in a given locale
    pub fn localized(locale: Option<String>, text: impl Into<String>) -> Self {
        Self {
            locale,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Key/value pair
    pub fn entry(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Language and country parts of the locale
    fn locale_parts(&self) -> (&str, &str) {
        match self.locale.as_deref() {
            Some(l) => l.split_once('_').unwrap_or((l, "")),
            None => ("", ""),
        }
    }
}

/// Parse state of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagStatus {
    /// Block is consistent with the profile
    Ok,
    /// Table entry points outside the profile
    Corrupted,
    /// Nothing known yet
    #[default]
    Undefined,
}

/// A parsed or synthesized ICC tag
#[derive(Debug, Clone)]
pub struct ProfileTag {
    usage: Signature,
    tag_type: Signature,
    status: TagStatus,
    /// CMM of the profile the tag was read from
    profile_cmm: Signature,
    required_module: Option<Signature>,
    last_module: OnceLock<Signature>,
    block: Option<Vec<u8>>,
    offset: Option<u32>,
    values: OnceLock<RefContainer<TagValue>>,
}

impl ProfileTag {
    /// Empty tag for `usage`
    pub fn new(usage: Signature) -> Self {
        Self {
            usage,
            tag_type: Signature::default(),
            status: TagStatus::Undefined,
            profile_cmm: Signature::default(),
            required_module: None,
            last_module: OnceLock::new(),
            block: None,
            offset: None,
            values: OnceLock::new(),
        }
    }

    /// Tag read from profile bytes at `offset`
    pub(crate) fn from_profile(
        usage: Signature,
        block: Vec<u8>,
        offset: u32,
        status: TagStatus,
        profile_cmm: Signature,
    ) -> Self {
        let tag_type = Signature::read(&block, 0).unwrap_or_default();
        Self {
            tag_type,
            status,
            profile_cmm,
            block: Some(block),
            offset: Some(offset),
            ..Self::new(usage)
        }
    }

    /// Synthetic `head` tag holding a copy of the profile header
    pub(crate) fn header(block: Vec<u8>, profile_cmm: Signature) -> Self {
        Self {
            tag_type: Signature::HEAD,
            status: TagStatus::Ok,
            profile_cmm,
            block: Some(block),
            offset: Some(0),
            ..Self::new(Signature::HEAD)
        }
    }

    /// Build a tag of `tag_type` from decoded values
    ///
    /// Fails with [`crate::Error::NoCodec`] when no codec in `registry`
    /// encodes `tag_type`.
    pub fn create(
        registry: &CodecRegistry,
        values: &[TagValue],
        usage: Signature,
        tag_type: Signature,
        version: u8,
    ) -> Result<Self> {
        let block = registry.encode(tag_type, values, version)?;
        let mut tag = Self::new(usage);
        tag.set(tag_type, usage, TagStatus::Ok, block);
        tag.required_module = Some(CodecRegistry::MODULE);
        Ok(tag)
    }

    /// Single text tag through the global registry
    pub fn create_from_text(text: &str, tag_type: Signature, usage: Signature) -> Result<Self> {
        Self::create(
            CodecRegistry::global(),
            &[TagValue::text(text)],
            usage,
            tag_type,
            0,
        )
    }

    pub fn usage(&self) -> Signature {
        self.usage
    }

    pub fn tag_type(&self) -> Signature {
        self.tag_type
    }

    pub fn status(&self) -> TagStatus {
        self.status
    }

    pub fn profile_cmm(&self) -> Signature {
        self.profile_cmm
    }

    pub fn required_module(&self) -> Option<Signature> {
        self.required_module
    }

    /// Module that last decoded the values
    pub fn last_module(&self) -> Option<Signature> {
        self.last_module.get().copied()
    }

    pub fn get_block(&self) -> Option<&[u8]> {
        self.block.as_deref()
    }

    /// Size of the raw block
    pub fn size(&self) -> usize {
        self.block.as_ref().map_or(0, Vec::len)
    }

    /// Replace block, type, usage and status
    ///
    /// The first 4 bytes of the block are stamped with `tag_type`. The
    /// tag loses its original offset and decoded values.
    pub fn set(&mut self, tag_type: Signature, usage: Signature, status: TagStatus, mut block: Vec<u8>) {
        if block.len() < 4 {
            block.resize(4, 0);
        }
        block[..4].copy_from_slice(&tag_type.to_bytes());
        self.tag_type = tag_type;
        self.usage = usage;
        self.status = status;
        self.block = Some(block);
        self.offset = None;
        self.values = OnceLock::new();
    }

    /// Original position inside the parent profile
    pub fn get_offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Option<u32>) {
        self.offset = offset;
    }

    /// Decoded values through the global registry
    pub fn get_values(&self) -> Result<&RefContainer<TagValue>> {
        self.get_values_with(CodecRegistry::global())
    }

    /// Decoded values, computed once and kept with the tag
    pub fn get_values_with(&self, registry: &CodecRegistry) -> Result<&RefContainer<TagValue>> {
        if let Some(values) = self.values.get() {
            return Ok(values);
        }

        let decoded = registry.decode(self.tag_type, self.block.as_deref().unwrap_or_default())?;
        let mut list = RefContainer::new(ParentKind::ProfileTag);
        list.set_name(self.usage.to_string());
        for value in decoded {
            list.push(value)?;
        }
        let _ = self.last_module.set(CodecRegistry::MODULE);
        Ok(self.values.get_or_init(|| list))
    }

    /// Texts selected by language and country
    ///
    /// - `language == Some("")` selects the best match for the process
    ///   locale and returns pure text;
    /// - otherwise an exact language/country match is preferred, then a
    ///   language match, then a country match;
    /// - with neither given every variant is returned.
    ///
    /// Localized variants are returned as `"de_DE:Licht"` unless the best
    /// match for the process locale was requested.
    pub fn get_text(&self, language: Option<&str>, country: Option<&str>) -> Vec<String> {
        self.select_text(language, country, &config::process_locale())
    }

    /// [`get_text`](Self::get_text) with an explicit process locale
    pub fn select_text(
        &self,
        language: Option<&str>,
        country: Option<&str>,
        locale: &Locale,
    ) -> Vec<String> {
        let values = match self.get_values() {
            Ok(values) => values,
            Err(err) => {
                log::debug!("tag '{}' has no text: {}", self.usage, err);
                return Vec::new();
            }
        };
        let values: Vec<&TagValue> = values.iter().map(|v| &**v).collect();
        select_localized(&values, language, country, locale)
    }
}

/// Language/country selection over localized values
fn select_localized(
    values: &[&TagValue],
    language: Option<&str>,
    country: Option<&str>,
    locale: &Locale,
) -> Vec<String> {
    let mut implicit = language == Some("");
    let (mut language, mut country) = if implicit {
        (Some(locale.language.as_str()), Some(locale.country.as_str()))
    } else {
        (language, country)
    };
    let given = |s: Option<&str>| s.is_some_and(|s| !s.is_empty());

    let mut texts = Vec::new();
    for k in 0..4 {
        for value in values {
            let (l, c) = value.locale_parts();
            let selected = match k {
                0 => given(language) && language == Some(l) && given(country) && country == Some(c),
                1 => given(language) && language == Some(l) && (country.is_none() || implicit),
                2 => given(country) && country == Some(c) && (language.is_none() || implicit),
                _ => (language.is_none() && country.is_none()) || implicit,
            };

            if selected {
                let localized = value.locale.as_deref().is_some_and(|l| {
                    l.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                });
                if localized && !implicit {
                    texts.push(format!("{}:{}", value.locale.as_deref().unwrap_or(""), value.text));
                } else {
                    texts.push(value.text.clone());
                    // no best match for the locale: take all
                    if k == 3 && implicit {
                        implicit = false;
                        language = None;
                        country = None;
                    }
                }
            }

            if implicit && !texts.is_empty() {
                return texts;
            }
        }
    }
    texts
}
