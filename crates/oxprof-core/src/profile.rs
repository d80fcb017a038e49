//! ICC Profile
//!
//! A [`Profile`] owns the raw bytes of an ICC profile, a lazily parsed tag
//! list and a cached content hash. Profiles loaded from disk or through a
//! standard role are shared as `Arc<Profile>` snapshots; editing happens
//! on an owned profile obtained through [`Profile::from_memory`] or
//! [`Profile::deep_copy`].
//!
//! # Serialization
//!
//! As long as no tag was added or removed, [`Profile::get_mem`] hands back
//! the bytes the profile was created from. After a tag change the profile
//! is rebuilt from its tag list: unmodified tags keep their original
//! offsets when those bytes still belong to them, other tags are appended
//! on 4 byte boundaries and the computed profile ID is written into the
//! header.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::cache::ProfileCache;
use crate::container::{ParentKind, RefContainer};
use crate::device::{self, DeviceDescriptor};
use crate::error::{Error, Result};
use crate::hash::{self, HashSource, ProfileHash};
use crate::icc::header::{self, HEADER_WITH_COUNT, PROFILE_ID_OFFSET};
use crate::icc::{
    MIN_PROFILE_SIZE, ProfileVersion, Signature, SignatureKind, TagEntry, align4,
    read_tag_table, table_end, write_tag_table, write_u32,
};
use crate::role::{self, StandardRole};
use crate::tag::{CodecRegistry, ProfileTag, TagStatus, TagValue, psid};

/// Options for loading profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Skip the file cache lookup
    pub no_cache_read: bool,
    /// Do not add the loaded profile to the file cache
    pub no_cache_write: bool,
    /// Reject profiles whose ICC major version differs
    pub only_version: Option<u8>,
}

impl LoadOptions {
    /// Bypass the file cache in both directions
    pub fn uncached() -> Self {
        Self {
            no_cache_read: true,
            no_cache_write: true,
            only_version: None,
        }
    }
}

/// Text representations of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Short identity string, see [`Profile::get_id`]
    Nick,
    /// Localized description, else the file name
    Description,
    /// XML like summary of role, file and hash
    Name,
}

/// ICC profile
#[derive(Debug)]
pub struct Profile {
    block: Option<Vec<u8>>,
    tags: OnceLock<RefContainer<ProfileTag>>,
    tags_modified: u32,
    hash: OnceLock<ProfileHash>,
    id: OnceLock<String>,
    file_name: OnceLock<String>,
    /// Resolved file names of device link members
    seq_names: Mutex<HashMap<usize, String>>,
    role: Option<StandardRole>,
    color_space: OnceLock<Signature>,
    channel_names: OnceLock<Vec<String>>,
    /// Device pattern for [`Profile::matches`]
    meta: Option<DeviceDescriptor>,
}

impl Profile {
    fn empty() -> Self {
        Self {
            block: None,
            tags: OnceLock::new(),
            tags_modified: 0,
            hash: OnceLock::new(),
            id: OnceLock::new(),
            file_name: OnceLock::new(),
            seq_names: Mutex::new(HashMap::new()),
            role: None,
            color_space: OnceLock::new(),
            channel_names: OnceLock::new(),
            meta: None,
        }
    }

    /// Create a profile from a private copy of `data`
    ///
    /// Fails with [`Error::Corrupted`] when the header is too small, has
    /// no `acsp` magic or claims more bytes than given.
    pub fn from_memory(data: &[u8], options: LoadOptions) -> Result<Self> {
        header::validate(data).map_err(|e| Error::Corrupted(e.to_string()))?;

        if let Some(major) = options.only_version {
            let version = ProfileVersion::from_field(header::read_field(data, SignatureKind::Version));
            if version.major != major {
                return Err(Error::NotFound(format!(
                    "profile version {}.{} does not match requested version {}",
                    version.major, version.minor, major
                )));
            }
        }

        Ok(Self {
            block: Some(data.to_vec()),
            ..Self::empty()
        })
    }

    /// Profile without bytes carrying a single signature
    ///
    /// Used to build patterns for [`Profile::matches`].
    pub fn from_signature(sig: Signature, kind: SignatureKind) -> Self {
        let mut profile = Self::empty();
        profile.set_signature(sig, kind);
        profile
    }

    /// Pattern matching profiles whose embedded device ranks above zero
    pub fn device_pattern(device: DeviceDescriptor) -> Self {
        Self {
            meta: Some(device),
            ..Self::empty()
        }
    }

    /// Pattern matching profiles whose file name contains `fragment`
    pub fn file_name_pattern(fragment: impl Into<String>) -> Self {
        Self {
            file_name: OnceLock::from(fragment.into()),
            ..Self::empty()
        }
    }

    /// Load a profile by name
    ///
    /// `name` is tried as given, then in each search path, then in the
    /// current directory. A 32 digit hex name that does not resolve to a
    /// file is looked up as a profile hash.
    pub fn from_file(cache: &ProfileCache, name: &str, options: LoadOptions) -> Result<Arc<Self>> {
        let Some(path) = cache.resolve(name) else {
            if let Some(hash) = hash::from_hex(name) {
                return Self::from_md5(cache, &hash);
            }
            return Err(Error::NotFound(name.to_string()));
        };

        let modified = fs::metadata(&path)?.modified().ok();
        if !options.no_cache_read {
            if let Some(profile) = cache.cached_file(&path, modified) {
                log::trace!("file cache hit: {}", path.display());
                profile.check_version(options)?;
                return Ok(profile);
            }
        }

        let profile = Arc::new(Self::load_path(&path, options)?);
        if !options.no_cache_write {
            cache.store_file(path, modified, Arc::clone(&profile));
        }
        Ok(profile)
    }

    /// Read and parse the file at `path`, remembering its name
    pub(crate) fn load_path(path: &Path, options: LoadOptions) -> Result<Self> {
        let data = fs::read(path)?;
        let profile = Self::from_memory(&data, options)
            .map_err(|e| match e {
                Error::Corrupted(msg) => Error::Corrupted(format!("{}: {}", path.display(), msg)),
                other => other,
            })?;
        let _ = profile.file_name.set(path.to_string_lossy().into_owned());
        Ok(profile)
    }

    /// Profile configured for `role`
    ///
    /// The result is kept in the role cache of `cache` for as long as the
    /// configured file name stays the same. When the configured file
    /// cannot be read, well known alternative names are tried.
    pub fn from_standard_role(cache: &ProfileCache, role: StandardRole) -> Result<Arc<Self>> {
        let configured = cache
            .settings()
            .role_file(role)
            .unwrap_or(role.default_file())
            .to_string();

        if let Some(profile) = cache.role_profile(role, &configured) {
            return Ok(profile);
        }

        let mut candidates = vec![configured.as_str()];
        candidates.extend_from_slice(role::aliases(&configured));
        for name in candidates {
            let Some(path) = cache.resolve(name) else {
                log::debug!("role {} candidate {} not found", role.key(), name);
                continue;
            };
            match Self::load_path(&path, LoadOptions::default()) {
                Ok(mut profile) => {
                    profile.role = Some(role);
                    let profile = Arc::new(profile);
                    cache.store_role(role, configured.clone(), Arc::clone(&profile));
                    return Ok(profile);
                }
                Err(err) => log::warn!("role {}: cannot load {}: {}", role.key(), path.display(), err),
            }
        }

        log::error!("no profile found for role {} ({})", role.key(), configured);
        Err(Error::NotFound(format!("{} for role {}", configured, role.key())))
    }

    /// First profile on the search path with content hash `hash`
    pub fn from_md5(cache: &ProfileCache, hash: &ProfileHash) -> Result<Arc<Self>> {
        cache
            .find_by_hash(hash)?
            .ok_or_else(|| Error::NotFound(format!("profile with hash {}", hash::to_hex(hash))))
    }

    fn check_version(&self, options: LoadOptions) -> Result<()> {
        match options.only_version {
            Some(major) if self.version().major != major => Err(Error::NotFound(format!(
                "profile version {} does not match requested version {}",
                self.version().major,
                major
            ))),
            _ => Ok(()),
        }
    }

    /// Deep copy with its own tag list; the hash is recomputed on demand
    pub fn deep_copy(&self) -> Self {
        let seq_names = self
            .seq_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Self {
            block: self.block.clone(),
            tags: self
                .tags
                .get()
                .map(|tags| OnceLock::from(tags.deep_copy()))
                .unwrap_or_default(),
            tags_modified: self.tags_modified,
            hash: OnceLock::new(),
            id: OnceLock::new(),
            file_name: self.file_name.clone(),
            seq_names: Mutex::new(seq_names),
            role: self.role,
            color_space: self.color_space.clone(),
            channel_names: self.channel_names.clone(),
            meta: self.meta.clone(),
        }
    }

    /// Standard role this profile was loaded for
    pub fn role(&self) -> Option<StandardRole> {
        self.role
    }

    pub fn version(&self) -> ProfileVersion {
        ProfileVersion::from_field(self.get_signature(SignatureKind::Version))
    }

    /// Read a header signature
    ///
    /// The color space is cached; without bytes it defaults to XYZ.
    /// Other kinds are read from the header and are 0 when absent.
    pub fn get_signature(&self, kind: SignatureKind) -> Signature {
        match (kind, &self.block) {
            (SignatureKind::ColorSpace, None) => {
                self.color_space.get().copied().unwrap_or(Signature::XYZ_DATA)
            }
            (SignatureKind::ColorSpace, Some(block)) => *self
                .color_space
                .get_or_init(|| header::read_field(block, SignatureKind::ColorSpace)),
            (_, Some(block)) => header::read_field(block, kind),
            (_, None) => Signature::default(),
        }
    }

    /// Set a header signature
    ///
    /// The color space only updates the cached value (0 selects XYZ).
    /// Other kinds are written into the header, which is created with
    /// 128 zero bytes when the profile has no bytes yet.
    pub fn set_signature(&mut self, sig: Signature, kind: SignatureKind) {
        if kind == SignatureKind::ColorSpace {
            let sig = if sig.is_zero() { Signature::XYZ_DATA } else { sig };
            self.color_space = OnceLock::from(sig);
            self.channel_names = OnceLock::new();
            return;
        }

        let block = self.block.get_or_insert_with(Vec::new);
        header::write_field(block, kind, sig);

        // keep the head tag in sync
        if let Some(tags) = self.tags.get_mut() {
            let len = block.len().min(HEADER_WITH_COUNT);
            let head = ProfileTag::header(block[..len].to_vec(), header::read_field(block, SignatureKind::Cmm));
            if tags.get(0).is_some_and(|t| t.usage() == Signature::HEAD) {
                tags.release_at(0);
            }
            if let Err(err) = tags.move_in(Arc::new(head), Some(0)) {
                log::error!("cannot update header tag: {}", err);
            }
        }
        self.invalidate();
    }

    /// Signature value of a pattern; 0 means "don't care"
    fn pattern_signature(&self, kind: SignatureKind) -> Signature {
        match (kind, &self.block) {
            (SignatureKind::ColorSpace, _) if self.color_space.get().is_some() => {
                self.color_space.get().copied().unwrap_or_default()
            }
            (_, Some(block)) => header::read_field(block, kind),
            (_, None) => Signature::default(),
        }
    }

    fn invalidate(&mut self) {
        self.hash = OnceLock::new();
        self.id = OnceLock::new();
    }

    /// Number of color channels
    pub fn channels_count(&self) -> usize {
        header::channel_count(self.get_signature(SignatureKind::ColorSpace))
    }

    /// Channel names of the color space
    pub fn channel_names(&self) -> &[String] {
        self.channel_names
            .get_or_init(|| header::channel_names(self.get_signature(SignatureKind::ColorSpace)))
    }

    fn tags(&self) -> &RefContainer<ProfileTag> {
        self.tags.get_or_init(|| self.parse_tags())
    }

    fn with_tags_mut<R>(&mut self, f: impl FnOnce(&mut RefContainer<ProfileTag>) -> R) -> R {
        let mut tags = self.tags.take().unwrap_or_else(|| self.parse_tags());
        let result = f(&mut tags);
        self.tags = OnceLock::from(tags);
        result
    }

    /// Split the bytes into a `head` tag plus one tag per table entry
    fn parse_tags(&self) -> RefContainer<ProfileTag> {
        let mut tags = RefContainer::new(ParentKind::Profile);
        let Some(block) = &self.block else {
            return tags;
        };
        let cmm = header::read_field(block, SignatureKind::Cmm);

        let head_len = block.len().min(HEADER_WITH_COUNT);
        if let Err(err) = tags.push(ProfileTag::header(block[..head_len].to_vec(), cmm)) {
            log::error!("cannot store header tag: {}", err);
            return tags;
        }

        let entries = match read_tag_table(block) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("unreadable tag table: {}", err);
                return tags;
            }
        };

        for entry in entries {
            let tag = if entry.in_bounds(block.len()) {
                let start = entry.offset as usize;
                let data = block[start..start + entry.size as usize].to_vec();
                ProfileTag::from_profile(entry.signature, data, entry.offset, TagStatus::Ok, cmm)
            } else {
                log::warn!(
                    "tag '{}' at {}+{} exceeds profile size {}",
                    entry.signature,
                    entry.offset,
                    entry.size,
                    block.len()
                );
                ProfileTag::from_profile(entry.signature, Vec::new(), entry.offset, TagStatus::Corrupted, cmm)
            };
            if let Err(err) = tags.push(tag) {
                log::error!("cannot store tag '{}': {}", entry.signature, err);
                break;
            }
        }

        log::trace!("parsed {} tags", tags.count());
        tags
    }

    /// Number of tags including the synthetic `head` tag
    pub fn tag_count(&self) -> usize {
        self.tags().count()
    }

    pub fn get_tag_by_pos(&self, pos: usize) -> Option<Arc<ProfileTag>> {
        self.tags().get_ref(pos)
    }

    /// First tag with usage `usage`
    pub fn get_tag_by_id(&self, usage: Signature) -> Option<Arc<ProfileTag>> {
        self.tags().iter().find(|t| t.usage() == usage).cloned()
    }

    /// Insert `tag`, replacing every tag of the same usage
    pub fn tag_move_in(&mut self, tag: ProfileTag, pos: Option<usize>) -> Result<()> {
        let usage = tag.usage();
        self.with_tags_mut(|tags| {
            tags.retain(|t| t.usage() != usage);
            tags.move_in(Arc::new(tag), pos)
        })?;
        self.tags_modified += 1;
        self.invalidate();
        Ok(())
    }

    /// Remove the tag at `pos`; no-op when out of range
    pub fn tag_release_at(&mut self, pos: usize) {
        let released = self.with_tags_mut(|tags| tags.take_at(pos));
        if released.is_some() {
            self.tags_modified += 1;
            self.invalidate();
        }
    }

    /// Add a text tag in the type the profile version expects
    ///
    /// Version 4 profiles get `mluc` for description like usages,
    /// version 2 profiles get `desc`; everything else is `text`.
    pub fn add_tag_text(&mut self, usage: Signature, text: &str) -> Result<()> {
        let major = match self.version().major {
            0 => 4,
            major => major,
        };
        let description_like = [
            Signature::DESC,
            Signature::DMDD,
            Signature::DMND,
            Signature::VIEW_COND_DESC,
        ]
        .contains(&usage);

        let tag_type = if major >= 4 && (description_like || usage == Signature::COPYRIGHT) {
            Signature::TYPE_MLUC
        } else if description_like {
            Signature::TYPE_DESC
        } else {
            Signature::TYPE_TEXT
        };

        let tag = ProfileTag::create(
            CodecRegistry::global(),
            &[TagValue::text(text)],
            usage,
            tag_type,
            major,
        )?;
        self.tag_move_in(tag, None)
    }

    /// Serialized profile
    ///
    /// Empty when the profile has neither bytes nor tags.
    pub fn get_mem(&self) -> Vec<u8> {
        match &self.block {
            Some(block) if self.tags_modified == 0 => block.clone(),
            _ => self.serialize_tags(),
        }
    }

    /// Size of [`get_mem`](Self::get_mem)
    pub fn get_size(&self) -> usize {
        match &self.block {
            Some(block) if self.tags_modified == 0 => block.len(),
            _ => self.serialize_tags().len(),
        }
    }

    /// Rebuild the byte stream from the tag list
    fn serialize_tags(&self) -> Vec<u8> {
        let tags = self.tags();
        if tags.is_empty() && self.block.is_none() {
            return Vec::new();
        }

        let mut out = self.header_for_write();
        let body: Vec<&ProfileTag> = tags
            .iter()
            .map(|t| &**t)
            .filter(|t| t.usage() != Signature::HEAD)
            .filter(|t| {
                if t.status() == TagStatus::Corrupted {
                    log::warn!("dropping corrupted tag '{}'", t.usage());
                    return false;
                }
                true
            })
            .collect();

        let data_start = table_end(body.len());
        out.resize(data_start, 0);

        let mut entries: Vec<Option<TagEntry>> = vec![None; body.len()];

        let original = self.block.as_deref().unwrap_or_default();
        let mut placed: Vec<(usize, usize)> = Vec::new();

        // Unmodified tags stay where they were. An offset is only trusted
        // when this profile's bytes at that range are the tag's own bytes,
        // so tags moved in from another profile are appended instead.
        // Ranges may be shared exactly but never partially overlap.
        for (i, tag) in body.iter().enumerate() {
            let (Some(offset), Some(block)) = (tag.get_offset(), tag.get_block()) else {
                continue;
            };
            let start = offset as usize;
            let end = start + block.len();
            if start < data_start || original.get(start..end) != Some(block) {
                continue;
            }
            let overlaps = placed
                .iter()
                .any(|&(s, e)| (s, e) != (start, end) && start < e && s < end);
            if overlaps {
                continue;
            }
            placed.push((start, end));
            if out.len() < end {
                out.resize(end, 0);
            }
            out[start..end].copy_from_slice(block);
            entries[i] = Some(TagEntry {
                signature: tag.usage(),
                offset,
                size: block.len() as u32,
            });
        }

        // Everything else is appended
        for (i, tag) in body.iter().enumerate() {
            if entries[i].is_some() {
                continue;
            }
            let block = tag.get_block().unwrap_or_default();
            let start = align4(out.len());
            out.resize(start, 0);
            out.extend_from_slice(block);
            entries[i] = Some(TagEntry {
                signature: tag.usage(),
                offset: start as u32,
                size: block.len() as u32,
            });
        }

        let entries: Vec<TagEntry> = entries.into_iter().flatten().collect();
        out.resize(align4(out.len()), 0);
        let total = out.len() as u32;
        write_u32(&mut out, 0, total);
        write_tag_table(&mut out, &entries);

        let id = hash::compute_md5(&out);
        out[PROFILE_ID_OFFSET..PROFILE_ID_OFFSET + 16].copy_from_slice(&id);
        out
    }

    /// Header for a rebuilt byte stream, 128 bytes
    fn header_for_write(&self) -> Vec<u8> {
        let source = self
            .tags()
            .iter()
            .find(|t| t.usage() == Signature::HEAD)
            .and_then(|t| t.get_block().map(<[u8]>::to_vec))
            .or_else(|| self.block.clone());

        let mut header = match source {
            Some(mut header) if header.len() >= MIN_PROFILE_SIZE => {
                header.truncate(MIN_PROFILE_SIZE);
                header
            }
            _ => {
                let mut header = vec![0u8; MIN_PROFILE_SIZE];
                header::write_field(&mut header, SignatureKind::Magic, Signature::MAGIC);
                header::write_field(
                    &mut header,
                    SignatureKind::Version,
                    ProfileVersion { major: 4, minor: 3, patch: 0 }.to_field(),
                );
                header
            }
        };

        if let Some(color_space) = self.color_space.get() {
            header::write_field(&mut header, SignatureKind::ColorSpace, *color_space);
        }
        header[PROFILE_ID_OFFSET..PROFILE_ID_OFFSET + 16].fill(0);
        header
    }

    /// Content hash from `source`
    ///
    /// A profile without bytes and tags hashes to zero.
    pub fn get_md5(&self, source: HashSource) -> ProfileHash {
        let data = self.get_mem();
        if data.is_empty() {
            return [0; 16];
        }
        hash::profile_hash(&data, source)
    }

    /// Cached content hash, embedded ID preferred
    pub fn get_hash(&self) -> ProfileHash {
        *self.hash.get_or_init(|| {
            let hash = self.get_md5(HashSource::Header);
            log::trace!("profile hash {}", hash::to_hex(&hash));
            hash
        })
    }

    /// Identity string
    ///
    /// The standard role id if the profile came from a role lookup, else
    /// the file name, else the content hash in hex. Stable while the
    /// profile is not modified.
    pub fn get_id(&self) -> &str {
        self.id.get_or_init(|| {
            if let Some(role) = self.role {
                return role.id().to_string();
            }
            match self.file_name.get() {
                Some(name) if !name.is_empty() => name.clone(),
                _ => hash::to_hex(&self.get_hash()),
            }
        })
    }

    /// Profiles are equal when their content hashes are
    pub fn equal(&self, other: &Profile) -> bool {
        self.get_hash() == other.get_hash()
    }

    pub fn get_text(&self, kind: TextKind) -> String {
        match kind {
            TextKind::Nick => self.get_id().to_string(),
            TextKind::Description => self
                .description()
                .or_else(|| {
                    self.file_name
                        .get()
                        .and_then(|f| Path::new(f).file_name())
                        .map(|f| f.to_string_lossy().into_owned())
                })
                .unwrap_or_else(|| self.get_id().to_string()),
            TextKind::Name => format!(
                r#"<profile use_default="{}" file_name="{}" hash="{}" />"#,
                self.role.map_or(0, StandardRole::id),
                self.file_name.get().map_or("", String::as_str),
                hash::to_hex(&self.get_hash())
            ),
        }
    }

    fn description(&self) -> Option<String> {
        let tag = self.get_tag_by_id(Signature::DESC)?;
        tag.get_text(Some(""), None)
            .into_iter()
            .find(|t| !t.is_empty())
    }

    /// Known file name, without searching
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.get().map(String::as_str).filter(|n| !n.is_empty())
    }

    /// File name of this profile or of a device link member
    ///
    /// With `seq_pos == None` the stored file name is returned, or the
    /// search path is scanned for a profile with the same hash. With
    /// `Some(pos)` the hash of member `pos` of the `psid` tag is resolved
    /// the same way. Results are remembered.
    pub fn get_file_name(&self, cache: &ProfileCache, seq_pos: Option<usize>) -> Option<String> {
        let Some(pos) = seq_pos else {
            if let Some(name) = self.file_name() {
                return Some(name.to_string());
            }
            let name = lookup_name(cache, &self.get_hash())?;
            let _ = self.file_name.set(name.clone());
            return Some(name);
        };

        let mut seq_names = self.seq_names.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(name) = seq_names.get(&pos) {
            return Some(name.clone());
        }

        let tag = self.get_tag_by_id(Signature::PSID)?;
        let values = match tag.get_values() {
            Ok(values) => values,
            Err(err) => {
                log::debug!("psid tag unreadable: {}", err);
                return None;
            }
        };
        let values: Vec<_> = values.iter().map(|v| (**v).clone()).collect();
        let hash = hash::from_hex(psid::member_hash(&values, pos)?)?;
        let name = lookup_name(cache, &hash)?;
        seq_names.insert(pos, name.clone());
        Some(name)
    }

    /// Device description embedded in the profile
    ///
    /// The `meta` dictionary is copied first. `dmdd` and `dmnd` provide
    /// `model` and `manufacturer` when the dictionary does not and the
    /// tag holds exactly one text.
    pub fn device_get(&self) -> DeviceDescriptor {
        let mut device = DeviceDescriptor::new();

        if let Some(meta) = self.get_tag_by_id(Signature::META) {
            match meta.get_values() {
                Ok(values) => {
                    let mut alt_serial = None;
                    for value in values.iter() {
                        let Some(key) = value.key.as_deref() else {
                            continue;
                        };
                        if key.ends_with("_serial") && alt_serial.is_none() {
                            alt_serial = Some(value.text.clone());
                        }
                        device.set(key, &value.text);
                    }
                    if let Some(serial) = alt_serial.filter(|_| device.get("serial").is_none()) {
                        device.set("serial", serial);
                    }
                }
                Err(err) => log::debug!("meta tag unreadable: {}", err),
            }
        }

        for (usage, key) in [(Signature::DMDD, "model"), (Signature::DMND, "manufacturer")] {
            if device.get(key).is_some() {
                continue;
            }
            let Some(tag) = self.get_tag_by_id(usage) else {
                continue;
            };
            if let [text] = tag.get_text(Some(""), None).as_slice() {
                if !text.is_empty() {
                    device.set(key, text);
                }
            }
        }

        device
    }

    /// Whether this profile matches `pattern`
    ///
    /// - a device pattern matches when the embedded device ranks above 0;
    /// - a file name pattern matches as a substring of the file name;
    /// - otherwise every header signature set on both sides must agree.
    pub fn matches(&self, pattern: &Profile) -> bool {
        if let Some(device) = &pattern.meta {
            return device::profile_rank(&self.device_get(), device) > 0;
        }
        if let Some(fragment) = pattern.file_name() {
            return self.file_name().is_some_and(|name| name.contains(fragment));
        }
        SignatureKind::ALL.iter().all(|&kind| {
            let wanted = pattern.pattern_signature(kind);
            let have = self.get_signature(kind);
            wanted.is_zero() || have.is_zero() || wanted == have
        })
    }

    /// Write [`get_mem`](Self::get_mem) to `path`, replacing its content
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.get_mem();
        if data.is_empty() {
            return Err(Error::Corrupted("profile has no data".into()));
        }
        fs::write(path, data)?;
        Ok(())
    }

    /// Install into `dir` or the configured user path
    ///
    /// The description becomes the file name. Fails with
    /// [`Error::AlreadyInstalled`] when a profile with the same
    /// description or file name is found on the search path.
    pub fn install(&self, cache: &ProfileCache, dir: Option<&Path>) -> Result<PathBuf> {
        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => cache
                .settings()
                .user_path
                .clone()
                .ok_or_else(|| Error::Config("no user profile path configured".into()))?,
        };

        let description = self.description().unwrap_or_default();
        if description.is_empty() {
            return Err(Error::Corrupted("profile has no description".into()));
        }
        let lower = description.to_ascii_lowercase();
        let file = if lower.ends_with(".icc") || lower.ends_with(".icm") {
            description.clone()
        } else {
            format!("{}.icc", description)
        };

        for installed in cache.profiles()? {
            let same_name = installed
                .file_name()
                .and_then(|f| Path::new(f).file_name())
                .is_some_and(|f| f.to_string_lossy() == file.as_str());
            if same_name || installed.description().as_deref() == Some(description.as_str()) {
                return Err(Error::AlreadyInstalled(description));
            }
        }

        let path = dir.join(&file);
        if path.exists() {
            return Err(Error::AlreadyInstalled(path.display().to_string()));
        }
        fs::create_dir_all(&dir)?;
        self.to_file(&path)?;
        log::info!("installed {}", path.display());
        Ok(path)
    }
}

fn lookup_name(cache: &ProfileCache, hash: &ProfileHash) -> Option<String> {
    match cache.find_by_hash(hash) {
        Ok(found) => found.and_then(|p| p.file_name().map(str::to_string)),
        Err(err) => {
            log::warn!("profile scan failed: {}", err);
            None
        }
    }
}
