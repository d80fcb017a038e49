//! Tag codec registry
//!
//! Codecs translate between a tag's raw block and its decoded
//! [`TagValue`] list. The registry maps a tag type signature to the codec
//! handling it; asking for a type nobody registered yields
//! [`Error::NoCodec`].

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::icc::{IccError, Signature};

use super::TagValue;
use super::dict::DictCodec;
use super::numeric::{CurveCodec, SigCodec, XyzCodec};
use super::psid::PsidCodec;
use super::text::{DescCodec, MlucCodec, TextCodec};

/// Encoder/decoder for one ICC tag type
pub trait TagCodec: Send + Sync {
    /// Type signature this codec handles
    fn tag_type(&self) -> Signature;

    /// Decode a complete tag block (type signature included)
    fn decode(&self, block: &[u8]) -> Result<Vec<TagValue>>;

    /// Build a complete tag block from values
    ///
    /// `version` is the ICC major version of the target profile, 0 when
    /// unknown.
    fn encode(&self, _values: &[TagValue], version: u8) -> Result<Vec<u8>> {
        Err(Error::NoCodec {
            tag_type: self.tag_type(),
            version,
        })
    }
}

/// Type signature to codec mapping
pub struct CodecRegistry {
    codecs: HashMap<Signature, Box<dyn TagCodec>>,
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.codecs.keys().map(|s| s.to_string()).collect();
        types.sort();
        f.debug_struct("CodecRegistry").field("types", &types).finish()
    }
}

impl CodecRegistry {
    /// Identifier recorded on tags decoded through a registry
    pub const MODULE: Signature = Signature::from_bytes(*b"oxpf");

    /// Registry without any codec
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Registry with every built-in codec
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TextCodec));
        registry.register(Box::new(DescCodec));
        registry.register(Box::new(MlucCodec));
        registry.register(Box::new(DictCodec));
        registry.register(Box::new(PsidCodec));
        registry.register(Box::new(XyzCodec));
        registry.register(Box::new(CurveCodec));
        registry.register(Box::new(SigCodec));
        registry
    }

    /// Process wide registry, populated on first use
    pub fn global() -> &'static CodecRegistry {
        static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
        REGISTRY.get_or_init(CodecRegistry::with_defaults)
    }

    /// Add or replace the codec for its type
    pub fn register(&mut self, codec: Box<dyn TagCodec>) {
        self.codecs.insert(codec.tag_type(), codec);
    }

    pub fn get(&self, tag_type: Signature) -> Option<&dyn TagCodec> {
        self.codecs.get(&tag_type).map(|c| c.as_ref())
    }

    /// Decode `block` with the codec for `tag_type`
    ///
    /// The block must start with `tag_type`.
    pub fn decode(&self, tag_type: Signature, block: &[u8]) -> Result<Vec<TagValue>> {
        let codec = self.get(tag_type).ok_or(Error::NoCodec {
            tag_type,
            version: 0,
        })?;
        match Signature::read(block, 0) {
            Some(found) if found == tag_type => codec.decode(block),
            found => Err(IccError::InvalidTagType {
                expected: tag_type.0,
                found: found.unwrap_or_default().0,
            }
            .into()),
        }
    }

    pub fn encode(&self, tag_type: Signature, values: &[TagValue], version: u8) -> Result<Vec<u8>> {
        self.get(tag_type)
            .ok_or(Error::NoCodec { tag_type, version })?
            .encode(values, version)
    }
}

/// Block prefix: type signature plus 4 reserved bytes
pub(crate) fn block_header(tag_type: Signature) -> Vec<u8> {
    let mut block = Vec::with_capacity(64);
    block.extend_from_slice(&tag_type.to_bytes());
    block.extend_from_slice(&[0; 4]);
    block
}

/// Pad `block` with zeros to a 4 byte boundary
pub(crate) fn pad4(block: &mut Vec<u8>) {
    let len = crate::icc::align4(block.len());
    block.resize(len, 0);
}

/// Encode UTF-16BE without terminator
pub(crate) fn encode_utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|c| c.to_be_bytes()).collect()
}

/// Decode UTF-16BE bytes, stopping at a NUL character
pub(crate) fn decode_utf16be(data: &[u8]) -> Option<String> {
    let utf16: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .take_while(|&c| c != 0)
        .collect();

    String::from_utf16(&utf16).ok()
}
