//! Profile sets
//!
//! A [`ProfileSet`] is an ordered list of shared profiles, usually
//! selected from the scan cache by signature patterns and then ordered
//! against a device with [`ProfileSet::device_rank`].

use std::path::Path;
use std::sync::Arc;

use crate::cache::ProfileCache;
use crate::container::{ParentKind, RefContainer};
use crate::device::{self, DeviceDescriptor};
use crate::error::Result;
use crate::icc::{Signature, SignatureKind};
use crate::profile::Profile;
use crate::role::StandardRole;

/// Profile selections for common purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileClass {
    EditingRgb,
    EditingCmyk,
    EditingXyz,
    EditingLab,
    EditingGray,
    AssumedRgb,
    AssumedCmyk,
    AssumedXyz,
    AssumedLab,
    AssumedGray,
    /// The assumed web profile only, without scanning
    AssumedWeb,
    Proof,
    /// Every device and color space profile
    Any,
}

impl ProfileClass {
    /// Standard role supplying the default of this class
    pub const fn role(self) -> Option<StandardRole> {
        match self {
            Self::EditingRgb => Some(StandardRole::EditingRgb),
            Self::EditingCmyk => Some(StandardRole::EditingCmyk),
            Self::EditingXyz => Some(StandardRole::EditingXyz),
            Self::EditingLab => Some(StandardRole::EditingLab),
            Self::EditingGray => Some(StandardRole::EditingGray),
            Self::AssumedRgb => Some(StandardRole::AssumedRgb),
            Self::AssumedCmyk => Some(StandardRole::AssumedCmyk),
            Self::AssumedXyz => Some(StandardRole::AssumedXyz),
            Self::AssumedLab => Some(StandardRole::AssumedLab),
            Self::AssumedGray => Some(StandardRole::AssumedGray),
            Self::AssumedWeb => Some(StandardRole::AssumedWeb),
            Self::Proof => Some(StandardRole::Proof),
            Self::Any => None,
        }
    }

    /// Class and color space patterns selecting this class
    pub fn patterns(self) -> Vec<Profile> {
        const CMYK_CLASSES: [Signature; 4] = [
            Signature::OUTPUT_CLASS,
            Signature::INPUT_CLASS,
            Signature::DISPLAY_CLASS,
            Signature::COLOR_SPACE_CLASS,
        ];
        const EDITING_CLASSES: [Signature; 3] = [
            Signature::COLOR_SPACE_CLASS,
            Signature::INPUT_CLASS,
            Signature::DISPLAY_CLASS,
        ];

        match self {
            Self::EditingRgb | Self::AssumedRgb => class_patterns(&EDITING_CLASSES, Some(Signature::RGB_DATA)),
            Self::EditingXyz | Self::AssumedXyz => class_patterns(&EDITING_CLASSES, Some(Signature::XYZ_DATA)),
            Self::EditingLab | Self::AssumedLab => class_patterns(&EDITING_CLASSES, Some(Signature::LAB_DATA)),
            Self::EditingCmyk | Self::AssumedCmyk => class_patterns(&CMYK_CLASSES, Some(Signature::CMYK_DATA)),
            Self::EditingGray | Self::AssumedGray => class_patterns(
                &[
                    Signature::INPUT_CLASS,
                    Signature::DISPLAY_CLASS,
                    Signature::COLOR_SPACE_CLASS,
                ],
                Some(Signature::GRAY_DATA),
            ),
            Self::Proof => {
                let mut patterns = class_patterns(
                    &[Signature::OUTPUT_CLASS, Signature::DISPLAY_CLASS],
                    Some(Signature::RGB_DATA),
                );
                patterns.extend(class_patterns(&CMYK_CLASSES, Some(Signature::CMYK_DATA)));
                patterns
            }
            Self::Any => class_patterns(
                &[
                    Signature::COLOR_SPACE_CLASS,
                    Signature::INPUT_CLASS,
                    Signature::OUTPUT_CLASS,
                    Signature::DISPLAY_CLASS,
                ],
                None,
            ),
            Self::AssumedWeb => Vec::new(),
        }
    }
}

fn class_patterns(classes: &[Signature], color_space: Option<Signature>) -> Vec<Profile> {
    classes
        .iter()
        .map(|&class| {
            let mut pattern = Profile::from_signature(class, SignatureKind::Class);
            if let Some(color_space) = color_space {
                pattern.set_signature(color_space, SignatureKind::ColorSpace);
            }
            pattern
        })
        .collect()
}

/// Ordered list of shared profiles
#[derive(Debug, Clone)]
pub struct ProfileSet {
    list: RefContainer<Profile>,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileSet {
    pub fn new() -> Self {
        Self {
            list: RefContainer::new(ParentKind::ProfileSet),
        }
    }

    /// Select profiles from the scan cache
    ///
    /// A profile is kept when it matches any of `patterns` (or
    /// `patterns` is empty). Unless `allow_duplicates` is set, a profile
    /// equal to an earlier member is skipped.
    pub fn create(cache: &ProfileCache, patterns: &[Profile], allow_duplicates: bool) -> Result<Self> {
        let mut set = Self::new();
        for profile in cache.profiles()? {
            if !patterns.is_empty() && !patterns.iter().any(|pattern| profile.matches(pattern)) {
                continue;
            }
            if !allow_duplicates && set.iter().any(|member| member.equal(&profile)) {
                log::trace!("skipping duplicate {}", profile.get_id());
                continue;
            }
            set.move_in(profile, None)?;
        }
        Ok(set)
    }

    /// Profiles of `class` and the position of the configured default
    ///
    /// The default is found by comparing file names with the file
    /// configured for the class role.
    pub fn for_standard_class(cache: &ProfileCache, class: ProfileClass) -> Result<(Self, Option<usize>)> {
        if class == ProfileClass::AssumedWeb {
            let mut set = Self::new();
            set.move_in(Profile::from_standard_role(cache, StandardRole::AssumedWeb)?, None)?;
            return Ok((set, Some(0)));
        }

        let set = Self::create(cache, &class.patterns(), false)?;

        let default_name = class
            .role()
            .map(|role| cache.settings().role_file(role).unwrap_or(role.default_file()))
            .and_then(|name| Path::new(name).file_name());
        let current = default_name.and_then(|default_name| {
            set.iter().position(|profile| {
                profile
                    .file_name()
                    .and_then(|name| Path::new(name).file_name())
                    .is_some_and(|name| name == default_name)
            })
        });

        Ok((set, current))
    }

    pub fn count(&self) -> usize {
        self.list.count()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// New reference to member `pos`
    pub fn get(&self, pos: usize) -> Option<Arc<Profile>> {
        self.list.get_ref(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Profile>> + '_ {
        self.list.iter()
    }

    /// Insert `profile` at `pos`, appending when `None` or out of range
    pub fn move_in(&mut self, profile: Arc<Profile>, pos: Option<usize>) -> Result<()> {
        self.list.check_parent(ParentKind::ProfileSet)?;
        self.list.move_in(profile, pos)
    }

    pub fn release_at(&mut self, pos: usize) {
        self.list.release_at(pos);
    }

    /// Order members by how well their embedded device matches `device`
    ///
    /// Returns the ranks in the new member order. Members of equal rank
    /// keep their previous relative order.
    pub fn device_rank(&mut self, device: &DeviceDescriptor) -> Vec<i32> {
        let mut ranks: Vec<i32> = self
            .list
            .iter()
            .map(|profile| device::profile_rank(&profile.device_get(), device))
            .collect();
        self.list.sort_by_rank(&mut ranks);
        ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns() {
        assert_eq!(ProfileClass::EditingRgb.patterns().len(), 3);
        assert_eq!(ProfileClass::Proof.patterns().len(), 6);
        assert_eq!(ProfileClass::EditingGray.patterns().len(), 3);
        assert!(ProfileClass::AssumedWeb.patterns().is_empty());

        let any = ProfileClass::Any.patterns();
        assert_eq!(any.len(), 4);
        assert!(
            any.iter()
                .all(|p| p.get_signature(SignatureKind::Class) != Signature::default())
        );

        for pattern in ProfileClass::AssumedCmyk.patterns() {
            assert_eq!(pattern.get_signature(SignatureKind::ColorSpace), Signature::CMYK_DATA);
        }
    }

    #[test]
    fn test_roles() {
        assert_eq!(ProfileClass::Proof.role(), Some(StandardRole::Proof));
        assert_eq!(ProfileClass::Any.role(), None);
    }

    #[test]
    fn test_move_in_and_release() {
        let mut set = ProfileSet::new();
        let a = Arc::new(Profile::from_signature(Signature::RGB_DATA, SignatureKind::ColorSpace));
        let b = Arc::new(Profile::from_signature(Signature::CMYK_DATA, SignatureKind::ColorSpace));
        set.move_in(Arc::clone(&a), None).unwrap();
        set.move_in(Arc::clone(&b), Some(0)).unwrap();
        assert_eq!(set.count(), 2);
        assert!(Arc::ptr_eq(&set.get(0).unwrap(), &b));

        set.release_at(0);
        assert!(Arc::ptr_eq(&set.get(0).unwrap(), &a));
        assert!(set.get(1).is_none());
    }
}
