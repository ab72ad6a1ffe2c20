// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-tree discovery through procfs.
//!
//! Children are read from `/proc/<pid>/task/<tid>/children`, one file per
//! thread. A process that exits mid-walk simply stops contributing.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use lull_core::Pid;

/// Read-only view of the process table.
pub trait ProcessTable: Send + Sync {
    fn exists(&self, pid: Pid) -> bool;

    /// Direct children of `pid` across all of its threads. Empty when the
    /// process is gone.
    fn children(&self, pid: Pid) -> Vec<Pid>;
}

/// [`ProcessTable`] backed by a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn task_ids(&self, pid: Pid) -> Vec<u32> {
        let Ok(entries) = std::fs::read_dir(self.root.join(pid.to_string()).join("task")) else {
            return Vec::new();
        };
        let mut tids: Vec<u32> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().to_str().and_then(|name| name.parse().ok()))
            .collect();
        tids.sort_unstable();
        tids
    }
}

impl ProcessTable for ProcFs {
    fn exists(&self, pid: Pid) -> bool {
        self.root.join(pid.to_string()).is_dir()
    }

    fn children(&self, pid: Pid) -> Vec<Pid> {
        let task_dir = self.root.join(pid.to_string()).join("task");
        let mut out = Vec::new();
        for tid in self.task_ids(pid) {
            let path = task_dir.join(tid.to_string()).join("children");
            match std::fs::read_to_string(&path) {
                Ok(contents) => {
                    out.extend(contents.split_whitespace().filter_map(|raw| raw.parse::<Pid>().ok()));
                }
                Err(e) => {
                    tracing::trace!(%pid, tid, error = %e, "task children unreadable");
                }
            }
        }
        out
    }
}

/// `root` followed by its descendants in breadth-first order, each pid once.
///
/// With `recurse == false` only `root`'s direct children are included.
/// A missing `root` yields an empty list.
pub fn descendants(table: &dyn ProcessTable, root: Pid, recurse: bool) -> Vec<Pid> {
    if !table.exists(root) {
        return Vec::new();
    }
    let mut seen = HashSet::from([root]);
    let mut found = vec![root];
    let mut queue = VecDeque::from([root]);

    while let Some(pid) = queue.pop_front() {
        for child in table.children(pid) {
            if !seen.insert(child) {
                continue;
            }
            found.push(child);
            if recurse {
                queue.push_back(child);
            }
        }
    }
    found
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::collections::HashMap;

    use lull_core::Pid;
    use parking_lot::Mutex;

    use super::ProcessTable;

    /// In-memory process table. A pid exists once it has been added.
    #[derive(Default)]
    pub struct FakeProcessTable {
        children: Mutex<HashMap<Pid, Vec<Pid>>>,
    }

    impl FakeProcessTable {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register `parent` (and each child) with the given children.
        pub fn add(&self, parent: u32, children: &[u32]) {
            let mut table = self.children.lock();
            for child in children {
                table.entry(Pid::new(*child)).or_default();
            }
            table.insert(Pid::new(parent), children.iter().copied().map(Pid::new).collect());
        }

        pub fn remove(&self, pid: u32) {
            self.children.lock().remove(&Pid::new(pid));
        }
    }

    impl ProcessTable for FakeProcessTable {
        fn exists(&self, pid: Pid) -> bool {
            self.children.lock().contains_key(&pid)
        }

        fn children(&self, pid: Pid) -> Vec<Pid> {
            self.children.lock().get(&pid).cloned().unwrap_or_default()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessTable;

#[cfg(test)]
#[path = "procfs_tests.rs"]
mod tests;
