// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Package-convention lookup for workflow templates.
//!
//! A template named `<name>` in package `<package>` lives at
//! `<root>/packages/<package>/workflows/<name>`. Roots are tried in order:
//!
//! 1. the working directory
//! 2. extra roots from settings
//! 3. the executable's directory and up to four of its ancestors, so an installed binary
//!    finds packages shipped next to it
//!
//! A name without an extension also matches `<name>.json`. Lookup failure is an empty path, not
//! an error; callers decide whether absence is fatal.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::consts::{MAX_ANCESTOR_SEARCH_DEPTH, PACKAGES_DIR, WORKFLOWS_DIR};
use crate::observability::messages::boot::{TemplateResolved, TemplateUnresolved};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone)]
pub struct TemplateResolver {
    roots: Vec<PathBuf>,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl TemplateResolver {
    /// Resolver over the default search roots with `extra_roots` after the working directory.
    pub fn new(extra_roots: &[PathBuf]) -> Self {
        let mut roots = Vec::new();
        if let Ok(cwd) = env::current_dir() {
            roots.push(cwd);
        }
        roots.extend(extra_roots.iter().cloned());
        if let Some(exe_dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            roots.extend(
                exe_dir
                    .ancestors()
                    .take(MAX_ANCESTOR_SEARCH_DEPTH + 1)
                    .map(Path::to_path_buf),
            );
        }

        let mut unique: Vec<PathBuf> = Vec::with_capacity(roots.len());
        for root in roots {
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        Self { roots: unique }
    }

    /// Resolver that searches exactly `roots`, in order.
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Path of the template, or an empty `PathBuf` when no root has it.
    pub fn resolve(&self, package: &str, name: &str) -> PathBuf {
        for root in &self.roots {
            for candidate in candidates(root, package, name) {
                if candidate.is_file() {
                    TemplateResolved {
                        package,
                        name,
                        path: &candidate,
                    }
                    .log();
                    return candidate;
                }
            }
        }

        TemplateUnresolved {
            package,
            name,
            roots_searched: self.roots.len(),
        }
        .log();
        PathBuf::new()
    }
}

fn candidates(root: &Path, package: &str, name: &str) -> Vec<PathBuf> {
    let workflows = root.join(PACKAGES_DIR).join(package).join(WORKFLOWS_DIR);
    let mut paths = vec![workflows.join(name)];
    if Path::new(name).extension().is_none() {
        paths.push(workflows.join(format!("{}.json", name)));
    }
    paths
}
