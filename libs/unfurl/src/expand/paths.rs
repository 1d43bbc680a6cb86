use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::errors::ValidationError;
use super::validate::is_identifier;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A requested association path, e.g. `user.role`.
///
/// While walking the object graph, paths are progressively narrowed to the
/// segments that are still left to resolve. The full path, as requested by the client,
/// is always available via [`ExpandPath::full_path`] for diagnostics.
pub struct ExpandPath {
    segments: Arc<[String]>,
    depth: usize,
}

impl ExpandPath {
    /// Parse a dotted path.
    ///
    /// It returns `None` if any segment is not a valid identifier.
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<String> = raw.split('.').map(ToOwned::to_owned).collect();
        if !segments.iter().all(|s| is_identifier(s)) {
            return None;
        }
        Some(Self {
            segments: segments.into(),
            depth: 0,
        })
    }

    /// The segments left to resolve at the current depth.
    pub fn segments(&self) -> &[String] {
        &self.segments[self.depth..]
    }

    /// The first segment left to resolve.
    pub fn head(&self) -> &str {
        &self.segments[self.depth]
    }

    /// `true` if there is a single segment left to resolve.
    pub fn is_leaf(&self) -> bool {
        self.segments.len() - self.depth == 1
    }

    /// The path as requested by the client.
    pub fn full_path(&self) -> String {
        self.segments.join(".")
    }

    /// The full path of the parent association, if there is one.
    pub fn parent_path(&self) -> Option<String> {
        let (_, parent) = self.segments.split_last()?;
        if parent.is_empty() {
            None
        } else {
            Some(parent.join("."))
        }
    }

    fn relative_parent(&self) -> &[String] {
        let segments = self.segments();
        &segments[..segments.len() - 1]
    }

    fn tail(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            depth: self.depth + 1,
        }
    }
}

impl fmt::Display for ExpandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A deduplicated set of requested association paths.
///
/// Build it with [`validate`](super::validate) or [`ExpandPaths::parse`].
/// Use [`ExpandPaths::level`] to look at the paths one segment at a time.
pub struct ExpandPaths {
    // Keyed by the segments left to resolve.
    paths: IndexMap<Vec<String>, ExpandPath>,
}

impl ExpandPaths {
    /// An empty set: nothing gets expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of dotted paths.
    pub fn parse<I, S>(paths: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for (index, raw) in paths.into_iter().enumerate() {
            let raw = raw.as_ref();
            let Some(path) = ExpandPath::parse(raw) else {
                return Err(ValidationError::MalformedPath {
                    index,
                    value: Value::from(raw).to_string(),
                });
            };
            parsed.push(path);
        }
        Ok(parsed.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ExpandPath> {
        self.paths.values()
    }

    /// `true` if `segment` itself was requested at this level.
    pub fn is_requested(&self, segment: &str) -> bool {
        self.iter().any(|p| p.is_leaf() && p.head() == segment)
    }

    /// The paths requested under `segment`, relative to it.
    ///
    /// It's empty if `segment` wasn't requested.
    pub fn subset(&self, segment: &str) -> ExpandPaths {
        self.level()
            .get(segment)
            .map(|branch| branch.subset.clone())
            .unwrap_or_default()
    }

    /// Group the paths by their first segment.
    ///
    /// A segment becomes a [`Branch`] only if it was requested on its own.
    /// Nested paths whose parent wasn't requested end up in [`Level::orphans`].
    /// The levels below each branch are computed as well, see [`Branch::level`].
    pub fn level(&self) -> Level {
        let mut branches: IndexMap<String, Branch> = IndexMap::new();
        for path in self.iter().filter(|p| p.is_leaf()) {
            branches
                .entry(path.head().to_owned())
                .or_insert_with(|| Branch {
                    path: path.clone(),
                    subset: ExpandPaths::new(),
                    level: Level::default(),
                });
        }

        let mut orphans = Vec::new();
        for path in self.iter().filter(|p| !p.is_leaf()) {
            if !self.paths.contains_key(path.relative_parent()) {
                orphans.push(path.clone());
                continue;
            }
            // If there's no branch, one of the ancestors is an orphan and gets reported instead.
            if let Some(branch) = branches.get_mut(path.head()) {
                branch.subset.insert(path.tail());
            }
        }

        for branch in branches.values_mut() {
            branch.level = branch.subset.level();
        }
        Level { branches, orphans }
    }

    fn insert(&mut self, path: ExpandPath) {
        self.paths.entry(path.segments().to_vec()).or_insert(path);
    }
}

impl FromIterator<ExpandPath> for ExpandPaths {
    fn from_iter<T: IntoIterator<Item = ExpandPath>>(iter: T) -> Self {
        let mut paths = ExpandPaths::new();
        for path in iter {
            paths.insert(path);
        }
        paths
    }
}

#[derive(Debug, Clone, Default)]
/// One level of an [`ExpandPaths`] set. See [`ExpandPaths::level`].
pub struct Level {
    branches: IndexMap<String, Branch>,
    orphans: Vec<ExpandPath>,
}

impl Level {
    /// The requested segments, in the order they were first requested.
    pub fn branches(&self) -> impl Iterator<Item = (&str, &Branch)> {
        self.branches.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, segment: &str) -> Option<&Branch> {
        self.branches.get(segment)
    }

    /// Remove the branch for `segment`, marking it as consumed.
    pub fn take(&mut self, segment: &str) -> Option<Branch> {
        self.branches.shift_remove(segment)
    }

    /// Nested paths whose parent path wasn't requested.
    pub fn orphans(&self) -> &[ExpandPath] {
        &self.orphans
    }

    /// `true` if nothing was requested at this level.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.orphans.is_empty()
    }
}

#[derive(Debug, Clone)]
/// A segment requested at a given level, together with the paths nested under it.
pub struct Branch {
    path: ExpandPath,
    subset: ExpandPaths,
    level: Level,
}

impl Branch {
    /// The path that requested this segment.
    pub fn path(&self) -> &ExpandPath {
        &self.path
    }

    /// The paths requested under this segment, relative to it.
    pub fn subset(&self) -> &ExpandPaths {
        &self.subset
    }

    /// The next level down, i.e. `self.subset().level()`.
    pub fn level(&self) -> &Level {
        &self.level
    }
}
