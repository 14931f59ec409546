use crate::value::SubstitutionMap;
use std::borrow::Cow;

/// Combines substitution maps into one; the rightmost value wins for a key.
///
/// A single map is handed back as-is without copying. No maps yields an empty
/// map.
pub fn merge_maps(maps: &[SubstitutionMap]) -> Cow<'_, SubstitutionMap> {
    if let [only] = maps {
        return Cow::Borrowed(only);
    }

    let mut merged = SubstitutionMap::new();
    for map in maps {
        for (key, value) in map {
            merged.insert(key.clone(), value.clone());
        }
    }
    Cow::Owned(merged)
}
