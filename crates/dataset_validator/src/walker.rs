//! Directory tree traversal.
//!
//! Walks a dataset root depth-first, never following symbolic links, and
//! turns the tree into [`PartitionGroup`]s: one per leaf directory. Layout
//! problems are recorded in the [`IssueCollector`] as they are found.

use crate::collector::{IssueCollector, location};
use dataset_core::{DirectoryName, EntryFilter, IssueKind, PartitionPath, PartitionSegment};
use std::ffi::OsString;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// A leaf directory and the data files it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionGroup {
    pub path: PartitionPath,

    /// Directory relative to the dataset root
    pub dir: PathBuf,

    /// Data files relative to the dataset root, in name order
    pub files: Vec<PathBuf>,
}

impl PartitionGroup {
    pub fn location(&self) -> String {
        location(&self.dir)
    }
}

/// Result of a walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Leaf groups in depth-first order
    pub groups: Vec<PartitionGroup>,

    /// Directories whose listing was attempted, including the root
    pub directories_scanned: usize,
}

impl WalkOutcome {
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }
}

struct Entry {
    name: OsString,
    file_type: FileType,
}

struct PendingDir {
    relative: PathBuf,
    path: PartitionPath,
}

/// First key seen at each depth, and the directory it was seen in.
#[derive(Default)]
struct KeyRegistry {
    by_depth: Vec<(String, String)>,
}

impl KeyRegistry {
    /// Returns the conflicting `(key, location)` if `key` differs from the
    /// first key recorded at `depth`.
    fn check(&mut self, depth: usize, key: &str, dir: &str) -> Option<(String, String)> {
        match self.by_depth.get(depth) {
            Some((expected, other)) if expected != key => Some((expected.clone(), other.clone())),
            Some(_) => None,
            None => {
                // Depths are filled in order: a child is only reached
                // through a parent that registered the previous depth.
                self.by_depth.push((key.to_string(), dir.to_string()));
                None
            }
        }
    }
}

/// Depth-first walker over a dataset tree.
pub struct FolderWalker {
    filter: EntryFilter,
    timeout: Duration,
}

impl FolderWalker {
    /// Creates a walker; `timeout` bounds each directory listing.
    pub fn new(filter: EntryFilter, timeout: Duration) -> Self {
        Self { filter, timeout }
    }

    /// Walks the tree under `root`.
    ///
    /// The root is expected to exist and be a directory. Children are
    /// visited in byte order of their names, so the groups and issues are
    /// the same on every run over an unchanged tree.
    pub async fn walk(&self, root: &Path, issues: &mut IssueCollector) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let mut keys = KeyRegistry::default();
        let mut stack = vec![PendingDir {
            relative: PathBuf::new(),
            path: PartitionPath::root(),
        }];

        while let Some(current) = stack.pop() {
            outcome.directories_scanned += 1;
            let dir_location = location(&current.relative);

            let entries = match self.list_dir(&root.join(&current.relative)).await {
                Ok(entries) => entries,
                Err(cause) => {
                    warn!("Cannot list {}: {}", dir_location, cause);
                    issues.push(IssueKind::UnreadableDirectory { cause }, dir_location);
                    continue;
                }
            };

            let mut partitions: Vec<(OsString, PartitionSegment)> = Vec::new();
            let mut files: Vec<PathBuf> = Vec::new();

            for entry in entries {
                let name = entry.name.to_string_lossy().into_owned();
                let relative = current.relative.join(&entry.name);

                if self.filter.is_skipped(&name) {
                    debug!("Skipping hidden or ignored entry {}", location(&relative));
                    continue;
                }

                if entry.file_type.is_symlink() {
                    issues.push(IssueKind::SymlinkNotFollowed, location(&relative));
                } else if entry.file_type.is_dir() {
                    match DirectoryName::classify(&name) {
                        DirectoryName::Partition(segment) => partitions.push((entry.name, segment)),
                        DirectoryName::Malformed => issues.push(
                            IssueKind::InvalidPartitionDirectory { name },
                            location(&relative),
                        ),
                        DirectoryName::Plain => issues.push(
                            IssueKind::UnexpectedDirectory { name },
                            location(&relative),
                        ),
                    }
                } else if entry.file_type.is_file() {
                    if self.filter.is_data_file(&name) {
                        files.push(relative);
                    } else {
                        debug!("Skipping non-data file {}", location(&relative));
                    }
                } else {
                    debug!("Skipping special file {}", location(&relative));
                }
            }

            if partitions.is_empty() {
                if files.is_empty() {
                    issues.push(IssueKind::EmptyPartition, dir_location.clone());
                }
                debug!("Partition {} holds {} file(s)", dir_location, files.len());
                outcome.groups.push(PartitionGroup {
                    path: current.path,
                    dir: current.relative,
                    files,
                });
                continue;
            }

            if !files.is_empty() {
                issues.push(
                    IssueKind::MixedLeafDirectory { files: files.len() },
                    dir_location.clone(),
                );
            }

            let depth = current.path.depth();
            let mut children = Vec::with_capacity(partitions.len());
            for (name, segment) in partitions {
                let relative = current.relative.join(&name);
                let child_location = location(&relative);
                if let Some((expected, other)) = keys.check(depth, &segment.key, &child_location) {
                    issues.push(
                        IssueKind::PartitionKeyMismatch {
                            depth,
                            expected,
                            actual: segment.key.clone(),
                            other,
                        },
                        child_location,
                    );
                }
                children.push(PendingDir {
                    relative,
                    path: current.path.child(segment),
                });
            }

            // Reversed so the smallest name is popped first.
            stack.extend(children.into_iter().rev());
        }

        outcome
    }

    /// Lists one directory, sorted by name, within the timeout.
    async fn list_dir(&self, dir: &Path) -> Result<Vec<Entry>, String> {
        let listing = async {
            let mut read_dir = tokio::fs::read_dir(dir).await?;
            let mut entries = Vec::new();
            while let Some(entry) = read_dir.next_entry().await? {
                // `file_type` does not follow symlinks.
                let file_type = entry.file_type().await?;
                entries.push(Entry {
                    name: entry.file_name(),
                    file_type,
                });
            }
            Ok::<_, std::io::Error>(entries)
        };

        let mut entries = within(self.timeout, listing).await?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Runs a directory operation under `timeout`, flattening both failure
/// kinds into the cause reported for the directory.
async fn within<T>(
    timeout: Duration,
    operation: impl Future<Output = std::io::Result<T>>,
) -> Result<T, String> {
    match tokio::time::timeout(timeout, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("listing timed out after {:?}", timeout)),
    }
}
