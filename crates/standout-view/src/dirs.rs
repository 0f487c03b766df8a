//! Prioritized view directories.
//!
//! A [`Dirs`] list holds every directory views may be loaded from. Each
//! [`Dir`] carries a priority (higher is searched first) and a group name, so
//! one list can serve several independent lookups (e.g. `"default"` for pages
//! and `"mail"` for e-mail templates).
//!
//! # Example
//!
//! ```rust
//! use standout_view::Dirs;
//!
//! let dirs = Dirs::new()
//!     .dir("views/front", 0, "default")
//!     .dir("views/theme", 10, "default");
//!
//! let searched: Vec<&str> = dirs.all().iter().map(|d| d.path()).collect();
//! assert_eq!(searched, ["views/theme/", "views/front/"]);
//! ```
//!
//! # Containment
//!
//! [`Dirs::locate`] composes `dir + name` textually and then checks, without
//! touching the filesystem, that the result still lies inside `dir`. View names
//! such as `"../secrets"` are rejected before any existence check.

use std::path::{Component, Path, PathBuf};

/// The group used when none is given.
pub const DEFAULT_GROUP: &str = "default";

/// A single view directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dir {
    path: String,
    priority: i32,
    group: String,
}

impl Dir {
    /// Creates a directory entry, normalizing `path` to end with one `/`.
    pub fn new(path: impl Into<String>, priority: i32, group: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: format!("{}/", path.trim_end_matches('/')),
            priority,
            group: group.into(),
        }
    }

    /// The normalized directory path, always ending with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The search priority. Highest first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The group name.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Resolves `relative` inside this directory.
    ///
    /// Returns `None` if the composed path escapes the directory or does not
    /// name an existing regular file.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let root = normalize_lexically(Path::new(&self.path));
        let candidate = normalize_lexically(Path::new(&format!("{}{}", self.path, relative)));

        // Both sides are normalized, so any `..` left in the remainder climbs
        // above a root that has no normal component to pop (`.` or `..`).
        let contained = candidate.strip_prefix(&root).is_ok_and(|rest| {
            rest.components().next().is_some()
                && !rest.components().any(|c| c == Component::ParentDir)
        });
        if !contained {
            tracing::trace!(dir = %self.path, name = relative, "rejected path outside of view directory");
            return None;
        }

        tracing::trace!(path = %candidate.display(), "probing view file");
        candidate.is_file().then_some(candidate)
    }
}

/// An ordered list of view directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    dirs: Vec<Dir>,
    default_group: String,
}

impl Default for Dirs {
    fn default() -> Self {
        Self::new()
    }
}

impl Dirs {
    /// Creates an empty list using `"default"` as the default group.
    pub fn new() -> Self {
        Self {
            dirs: Vec::new(),
            default_group: DEFAULT_GROUP.to_string(),
        }
    }

    /// Creates a list from existing entries.
    pub fn from_dirs(dirs: impl IntoIterator<Item = Dir>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
            default_group: DEFAULT_GROUP.to_string(),
        }
    }

    /// Sets the group used by [`group`](Self::group) when called with `None`.
    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    /// Sets the default group in place.
    pub fn set_default_group(&mut self, group: impl Into<String>) {
        self.default_group = group.into();
    }

    /// The default group name.
    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Appends a directory entry.
    pub fn add(&mut self, dir: Dir) -> &mut Self {
        self.dirs.push(dir);
        self
    }

    /// Appends a directory, builder style.
    pub fn dir(mut self, path: impl Into<String>, priority: i32, group: impl Into<String>) -> Self {
        self.dirs.push(Dir::new(path, priority, group));
        self
    }

    /// Returns a new list holding only the entries of `group`, or of the
    /// default group when `group` is `None`.
    pub fn group(&self, group: Option<&str>) -> Dirs {
        let group = group.unwrap_or(&self.default_group);
        Dirs {
            dirs: self
                .dirs
                .iter()
                .filter(|d| d.group == group)
                .cloned()
                .collect(),
            default_group: self.default_group.clone(),
        }
    }

    /// All entries, highest priority first.
    ///
    /// The sort is stable: entries of equal priority keep insertion order.
    pub fn all(&self) -> Vec<&Dir> {
        let mut sorted: Vec<&Dir> = self.dirs.iter().collect();
        sorted.sort_by_key(|d| std::cmp::Reverse(d.priority));
        sorted
    }

    /// Finds the first file named `relative` in the default group.
    pub fn locate(&self, relative: &str) -> Option<PathBuf> {
        self.locate_in(None, relative)
    }

    /// Finds the first file named `relative` in `group`, searching by priority.
    pub fn locate_in(&self, group: Option<&str>, relative: &str) -> Option<PathBuf> {
        self.group(group)
            .all()
            .into_iter()
            .find_map(|dir| dir.resolve(relative))
    }

    /// Number of entries across all groups.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Returns true if no directory has been added.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Resolves `.` and `..` components without consulting the filesystem.
///
/// A `..` that cannot pop a normal component is kept, so a path climbing out
/// of a relative root never compares as contained.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;

    #[test]
    fn test_dir_normalizes_trailing_slash() {
        assert_eq!(Dir::new("views/front", 0, "default").path(), "views/front/");
        assert_eq!(Dir::new("views/front/", 0, "default").path(), "views/front/");
        assert_eq!(Dir::new("views/front///", 0, "default").path(), "views/front/");
        assert_eq!(Dir::new("/", 0, "default").path(), "/");
    }

    #[test]
    fn test_all_sorts_by_priority_descending() {
        let dirs = Dirs::new()
            .dir("low", -5, "default")
            .dir("mid", 0, "default")
            .dir("high", 20, "default");

        let paths: Vec<&str> = dirs.all().iter().map(|d| d.path()).collect();
        assert_eq!(paths, ["high/", "mid/", "low/"]);
    }

    #[test]
    fn test_group_filters_and_defaults() {
        let dirs = Dirs::new()
            .dir("front", 0, "default")
            .dir("mail", 0, "mail")
            .dir("back", 5, "default");

        let group = dirs.group(None);
        let default: Vec<&str> = group.all().iter().map(|d| d.path()).collect();
        assert_eq!(default, ["back/", "front/"]);

        let mail = dirs.group(Some("mail"));
        assert_eq!(mail.len(), 1);
        assert_eq!(mail.all()[0].path(), "mail/");

        assert!(dirs.group(Some("missing")).is_empty());
    }

    #[test]
    fn test_custom_default_group() {
        let dirs = Dirs::new()
            .dir("front", 0, "default")
            .dir("mail", 0, "mail")
            .with_default_group("mail");

        let group = dirs.group(None);
        let paths: Vec<&str> = group.all().iter().map(|d| d.path()).collect();
        assert_eq!(paths, ["mail/"]);
    }

    #[test]
    fn test_empty_list() {
        let dirs = Dirs::new();
        assert!(dirs.all().is_empty());
        assert!(dirs.locate("about.jinja").is_none());
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("front/./inc/../about.jinja")),
            PathBuf::from("front/about.jinja")
        );
        assert_eq!(
            normalize_lexically(Path::new("front/../../etc/passwd")),
            PathBuf::from("../etc/passwd")
        );
        assert_eq!(
            normalize_lexically(Path::new("/../etc")),
            PathBuf::from("/etc")
        );
    }

    #[test]
    fn test_locate_respects_priority() {
        let tmp = tempfile::tempdir().unwrap();
        let front = tmp.path().join("front");
        let back = tmp.path().join("back");
        fs::create_dir_all(front.join("inc")).unwrap();
        fs::create_dir_all(back.join("inc")).unwrap();
        fs::write(front.join("inc/footer.jinja"), "front").unwrap();
        fs::write(back.join("inc/footer.jinja"), "back").unwrap();

        let dirs = Dirs::new()
            .dir(front.to_string_lossy(), 0, "default")
            .dir(back.to_string_lossy(), 10, "default");

        let found = dirs.locate("inc/footer.jinja").unwrap();
        assert_eq!(fs::read_to_string(found).unwrap(), "back");
    }

    #[test]
    fn test_locate_rejects_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let views = tmp.path().join("views");
        fs::create_dir_all(&views).unwrap();
        fs::write(tmp.path().join("secret.jinja"), "secret").unwrap();

        let dirs = Dirs::new().dir(views.to_string_lossy(), 0, "default");

        assert!(dirs.locate("../secret.jinja").is_none());
        assert!(dirs.locate("inc/../../secret.jinja").is_none());
    }

    #[test]
    fn test_current_dir_root_rejects_parent() {
        let dir = Dir::new(".", 0, "default");
        assert!(dir.resolve("../anything.jinja").is_none());
    }

    #[test]
    fn test_current_dir_root_resolves_children() {
        assert!(Dir::new(".", 0, "default").resolve("Cargo.toml").is_some());
        assert!(Dir::new("./", 0, "default").resolve("./Cargo.toml").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_parent_relative_root() {
        let tmp = tempfile::tempdir().unwrap();
        let views = tmp.path().join("views");
        fs::create_dir_all(&views).unwrap();
        fs::write(views.join("about.jinja"), "about").unwrap();
        fs::write(tmp.path().join("secret.jinja"), "secret").unwrap();

        // Reach `views` from the working directory through leading `..`s.
        let cwd = std::env::current_dir().unwrap();
        let mut root = PathBuf::new();
        for _ in cwd.components().filter(|c| matches!(c, Component::Normal(_))) {
            root.push("..");
        }
        for component in views.components() {
            if let Component::Normal(part) = component {
                root.push(part);
            }
        }
        assert!(root.starts_with(".."));

        let dir = Dir::new(root.to_string_lossy(), 0, "default");
        let found = dir.resolve("about.jinja").unwrap();
        assert_eq!(fs::read_to_string(found).unwrap(), "about");
        assert!(dir.resolve("../secret.jinja").is_none());
        assert!(dir.resolve("").is_none());
    }

    #[test]
    fn test_locate_ignores_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("inc.jinja")).unwrap();

        let dirs = Dirs::new().dir(tmp.path().to_string_lossy(), 0, "default");
        assert!(dirs.locate("inc.jinja").is_none());
    }

    proptest! {
        #[test]
        fn prop_all_is_sorted_and_stable(priorities in proptest::collection::vec(-3i32..3, 0..24)) {
            let mut dirs = Dirs::new();
            for (i, priority) in priorities.iter().enumerate() {
                dirs.add(Dir::new(format!("d{i}"), *priority, "default"));
            }

            let all = dirs.all();
            prop_assert_eq!(all.len(), priorities.len());

            for pair in all.windows(2) {
                prop_assert!(pair[0].priority() >= pair[1].priority());
                if pair[0].priority() == pair[1].priority() {
                    let a: usize = pair[0].path().trim_start_matches('d').trim_end_matches('/').parse().unwrap();
                    let b: usize = pair[1].path().trim_start_matches('d').trim_end_matches('/').parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
