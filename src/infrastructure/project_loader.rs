//! Workspace Source Enumeration
//!
//! The "visible documents" of the CLI host: every Rust source reachable
//! from a Cargo manifest, or a plain directory walk when there is none.

use std::fs;
use std::path::{Path, PathBuf};

use cargo_metadata::MetadataCommand;

use crate::error::{Result, TrackError};

/// One source file of the workspace.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub crate_name: String,
    pub path: PathBuf,
    pub content: String,
}

pub struct ProjectLoader;

impl ProjectLoader {
    /// Load all sources of the workspace described by `manifest_path`,
    /// covering lib, bin and proc-macro targets of every member.
    pub fn load_workspace(manifest_path: &Path) -> Result<Vec<SourceFile>> {
        let metadata = MetadataCommand::new()
            .manifest_path(manifest_path)
            .no_deps()
            .exec()
            .map_err(|err| TrackError::Lookup(format!("cargo metadata failed: {err}")))?;

        let mut files = Vec::new();

        for package_id in &metadata.workspace_members {
            let Some(package) = metadata.packages.iter().find(|p| &p.id == package_id) else {
                continue;
            };
            for target in &package.targets {
                if !target
                    .kind
                    .iter()
                    .any(|k| matches!(k.as_str(), "lib" | "bin" | "proc-macro"))
                {
                    continue;
                }
                let src_path = &target.src_path;
                let src_dir = src_path.parent().unwrap_or(src_path);
                Self::collect_rs_recursive(src_dir.as_std_path(), &package.name, &mut files)?;
            }
        }

        // Multiple targets can point at the same directory (main.rs next to
        // lib.rs); dedup by path.
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        Ok(files)
    }

    /// Fallback for folders without a manifest; the directory name stands
    /// in for the crate name.
    pub fn load_folder(dir: &Path) -> Result<Vec<SourceFile>> {
        let crate_name = dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("crate")
            .to_string();

        let mut files = Vec::new();
        Self::collect_rs_recursive(dir, &crate_name, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn collect_rs_recursive(
        dir: &Path,
        crate_name: &str,
        out: &mut Vec<SourceFile>,
    ) -> Result<()> {
        if dir.ends_with("target") || dir.ends_with(".git") {
            return Ok(());
        }
        if !dir.exists() {
            return Ok(());
        }

        if dir.is_file() {
            // Single-file targets (a bare main.rs) land here.
            if dir.extension().is_some_and(|ext| ext == "rs") {
                let content = fs::read_to_string(dir)?;
                out.push(SourceFile {
                    crate_name: crate_name.to_string(),
                    path: dir.to_path_buf(),
                    content,
                });
            }
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                Self::collect_rs_recursive(&path, crate_name, out)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let content = fs::read_to_string(&path)?;
                out.push(SourceFile {
                    crate_name: crate_name.to_string(),
                    path,
                    content,
                });
            }
        }
        Ok(())
    }
}
