//! Addressable lights and scene membership resolution.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to a light by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightId(String);

impl LightId {
    pub fn new(id: impl Into<String>) -> Self {
        LightId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LightId {
    fn from(id: &str) -> Self {
        LightId::new(id)
    }
}

/// A single light a scene sends commands to.
///
/// The display name only matters for matching scene membership and for log
/// output; commands are addressed by [`LightId`].
///
/// ```
/// use hue_scenes::LightTarget;
///
/// let light = LightTarget::new("3f1c", "Hlwy 1");
/// assert_eq!(light.id().as_str(), "3f1c");
/// assert_eq!(light.name(), "Hlwy 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightTarget {
    id: LightId,
    name: String,
}

impl LightTarget {
    /// Create a new light target with the given id and display name.
    pub fn new(id: impl Into<String>, name: &str) -> Self {
        LightTarget {
            id: LightId::new(id),
            name: String::from(name),
        }
    }

    pub fn id(&self) -> &LightId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Select the discovered lights whose name appears in `names`.
///
/// The result keeps the order in which lights were discovered. Names that
/// match nothing are logged and skipped, so the result may be shorter than
/// `names` or even empty.
///
/// ```
/// use hue_scenes::{LightTarget, resolve_targets};
///
/// let discovered = vec![
///     LightTarget::new("1", "O1"),
///     LightTarget::new("2", "Kt 1"),
///     LightTarget::new("3", "O2"),
/// ];
/// let graveyard = resolve_targets(&discovered, &["O2", "O1", "O3"]);
/// let names: Vec<&str> = graveyard.iter().map(|l| l.name()).collect();
/// assert_eq!(names, ["O1", "O2"]);
/// ```
pub fn resolve_targets<S: AsRef<str>>(discovered: &[LightTarget], names: &[S]) -> Vec<LightTarget> {
    for name in names {
        let name = name.as_ref();
        if !discovered.iter().any(|light| light.name == name) {
            warn!("no light named {:?} was discovered", name);
        }
    }

    discovered
        .iter()
        .filter(|light| names.iter().any(|name| name.as_ref() == light.name))
        .cloned()
        .collect()
}
