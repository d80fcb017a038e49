//! Device matching
//!
//! A [`DeviceDescriptor`] is an ordered key/value description of a device
//! (`manufacturer`, `model`, `serial`, ...). Profiles embed such a
//! description in their `meta` tag; [`compare`] scores how well one
//! description matches another, and [`crate::ProfileSet::device_rank`]
//! orders a set of profiles by that score.

/// Allowed relative drift when comparing numeric values
pub const MATCH_DELTA: f64 = 0.0005;

const AUTOMATIC_KEYS: [&str; 2] = ["OYRANOS_automatic_generated", "OPENICC_automatic_generated"];

/// Scores of one device key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub key: String,
    /// Added when both sides carry matching values
    pub match_value: i32,
    /// Added when both sides carry the key with different values
    pub none_match_value: i32,
    /// Added when only the profile side carries the key
    pub not_found_value: i32,
}

impl RankEntry {
    pub fn new(key: impl Into<String>, match_value: i32, none_match_value: i32, not_found_value: i32) -> Self {
        Self {
            key: key.into(),
            match_value,
            none_match_value,
            not_found_value,
        }
    }
}

/// Per key scores used by [`compare`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankMap {
    entries: Vec<RankEntry>,
}

impl RankMap {
    pub fn new(entries: Vec<RankEntry>) -> Self {
        Self { entries }
    }

    /// Weights for typical devices
    pub fn default_map() -> Self {
        Self::new(vec![
            RankEntry::new("device_name", 2, -1, 0),
            // persistence only
            RankEntry::new("profile_name", 0, 0, 0),
            RankEntry::new("manufacturer", 1, -1, 0),
            RankEntry::new("model", 5, -5, 0),
            RankEntry::new("serial", 10, -2, 0),
            RankEntry::new("host", 1, 0, 0),
            RankEntry::new("system_port", 2, 0, 0),
            RankEntry::new("driver_version", 1, 0, 0),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&RankEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }
}

/// Ordered key/value device description
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceDescriptor {
    options: Vec<(String, String)>,
    rank_map: Option<RankMap>,
}

impl DeviceDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut device = Self::new();
        for (key, value) in pairs {
            device.set(key, value);
        }
        device
    }

    pub fn with_rank_map(mut self, rank_map: RankMap) -> Self {
        self.rank_map = Some(rank_map);
        self
    }

    pub fn rank_map(&self) -> Option<&RankMap> {
        self.rank_map.as_ref()
    }

    /// Set `key`, replacing an earlier value in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.options.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Whether the profile was generated without measurement
    pub fn is_automatic(&self) -> bool {
        AUTOMATIC_KEYS.iter().any(|k| self.get(k) == Some("1"))
    }

    /// Value of the pattern key belonging to device key `key`
    ///
    /// The first key in pattern order containing `key` answers, so
    /// `EDID_model` answers for `model`; an equal key is not preferred.
    fn pattern_value(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k.contains(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Compare two dictionary values
///
/// Both sides may hold comma separated alternatives. Two alternatives
/// match when they are equal as strings, as integers, or as floats
/// within `delta`.
pub fn dict_match(text: &str, pattern: &str, delta: f64) -> bool {
    text.split(',').any(|t| {
        let t_int = t.trim().parse::<i64>().ok();
        let t_dbl = t.trim().parse::<f64>().ok();
        pattern.split(',').any(|p| {
            if t == p {
                return true;
            }
            if let (Some(a), Some(b)) = (t_int, p.trim().parse::<i64>().ok()) {
                if a == b {
                    return true;
                }
            }
            matches!((t_dbl, p.trim().parse::<f64>().ok()), (Some(a), Some(b)) if (a - b).abs() / 2.0 < delta)
        })
    })
}

/// Rank of `device` against `pattern`
///
/// Every key of `device` found in `pattern` adds the match or mismatch
/// score of the rank map; keys missing from `pattern` add the not found
/// score. The rank map of `device` is preferred over the one of
/// `pattern`; without any map each match counts 1.
pub fn compare(device: &DeviceDescriptor, pattern: &DeviceDescriptor) -> i32 {
    let rank_map = device.rank_map().or(pattern.rank_map());
    let mut rank = 0;

    for (key, value) in device.iter() {
        let entry = rank_map.and_then(|map| map.get(key));
        match pattern.pattern_value(key) {
            Some(wanted) if dict_match(value, wanted, MATCH_DELTA) => match (rank_map, entry) {
                (Some(_), Some(entry)) => rank += entry.match_value,
                (Some(_), None) => {}
                (None, _) => rank += 1,
            },
            Some(_) => rank += entry.map_or(0, |e| e.none_match_value),
            None => rank += entry.map_or(0, |e| e.not_found_value),
        }
    }

    rank
}

/// Rank of a profile's embedded `device` against `pattern`
///
/// Automatically generated profiles lose 13 points when they claim a
/// serial number and 2 points otherwise.
pub fn profile_rank(device: &DeviceDescriptor, pattern: &DeviceDescriptor) -> i32 {
    let mut rank = compare(device, pattern);
    if device.is_automatic() {
        rank -= if device.get("serial").is_some() { 13 } else { 2 };
        log::debug!("automatic generated profile, rank now {}", rank);
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme(serial: Option<&str>) -> DeviceDescriptor {
        let mut device = DeviceDescriptor::from_pairs([("manufacturer", "Acme"), ("model", "X1")]);
        if let Some(serial) = serial {
            device.set("serial", serial);
        }
        device
    }

    #[test]
    fn test_dict_match() {
        assert!(dict_match("Acme", "Acme", MATCH_DELTA));
        assert!(dict_match("a,b,c", "x,c", MATCH_DELTA));
        assert!(dict_match("007", "7", MATCH_DELTA));
        assert!(dict_match("2.2", "2.2009", MATCH_DELTA));
        assert!(!dict_match("2.2", "2.21", MATCH_DELTA));
        assert!(!dict_match("Acme", "acme", MATCH_DELTA));
    }

    #[test]
    fn test_set_replaces() {
        let mut device = acme(None);
        device.set("model", "X2");
        assert_eq!(device.len(), 2);
        assert_eq!(device.get("model"), Some("X2"));
    }

    #[test]
    fn test_compare_without_map() {
        let pattern = acme(Some("0001"));
        assert_eq!(compare(&acme(None), &pattern), 2);
        assert_eq!(compare(&acme(Some("0001")), &pattern), 3);
        assert_eq!(compare(&acme(Some("0002")), &pattern), 2);
    }

    #[test]
    fn test_compare_with_default_map() {
        let pattern = acme(Some("0001")).with_rank_map(RankMap::default_map());
        assert_eq!(compare(&acme(None), &pattern), 6);
        assert_eq!(compare(&acme(Some("0001")), &pattern), 16);
        assert_eq!(compare(&acme(Some("0002")), &pattern), 4);

        let other = DeviceDescriptor::from_pairs([("manufacturer", "Other"), ("model", "Y")]);
        assert_eq!(compare(&other, &pattern), -6);
    }

    #[test]
    fn test_prefixed_pattern_keys() {
        let pattern = DeviceDescriptor::from_pairs([("EDID_model", "X1")]);
        assert_eq!(compare(&acme(None), &pattern), 1);
    }

    #[test]
    fn test_pattern_keys_in_pattern_order() {
        // the earlier containing key answers even with an equal key later
        let pattern = DeviceDescriptor::from_pairs([("EDID_model", "Y"), ("model", "X1")]);
        assert_eq!(pattern.pattern_value("model"), Some("Y"));
        assert_eq!(compare(&acme(None), &pattern), 0);

        let pattern = DeviceDescriptor::from_pairs([("model", "X1"), ("EDID_model", "Y")]);
        assert_eq!(compare(&acme(None), &pattern), 1);
    }

    #[test]
    fn test_automatic_penalty() {
        let pattern = acme(Some("0001"));
        let mut generated = acme(None);
        generated.set("OPENICC_automatic_generated", "1");
        assert_eq!(profile_rank(&generated, &pattern), 0);

        generated.set("serial", "0001");
        assert_eq!(profile_rank(&generated, &pattern), 3 - 13);
    }
}
