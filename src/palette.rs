//! Fixed chart colours for well-known tags, served to the front-end so every
//! client draws the same tag in the same colour.

use std::collections::BTreeMap;

const TAG_COLORS: &[(&str, &str)] = &[
    ("python", "#377eb8"),
    ("java", "#ff7f00"),
    ("javascript", "#4daf4a"),
    ("c++", "#984ea3"),
    ("c#", "#e41a1c"),
    ("html", "#f781bf"),
    ("css", "#a65628"),
    ("react", "#fdae61"),
    ("angular", "#66c2a5"),
    ("flutter", "#d73027"),
];

pub fn palette() -> BTreeMap<&'static str, &'static str> {
    TAG_COLORS.iter().copied().collect()
}
