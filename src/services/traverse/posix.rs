//! POSIX traversal strategy leveraging `rustix` primitives.
//!
//! Each child directory is opened with `openat` relative to its parent's
//! descriptor and enumerated with `getdents`, avoiding repeated resolution of
//! long absolute paths. Entry classification still goes through
//! [`TraversalContext::visit`] so results match the legacy backend exactly.

use super::strategy::TraversalStrategy;
use super::{StrategyKind, TraversalContext};
use crate::Result;
use std::path::Path;

#[cfg(unix)]
use super::context::Visit;
#[cfg(unix)]
use rustix::fd::OwnedFd;
#[cfg(unix)]
use rustix::fs::{self as rfs, Dir, Mode, OFlags};
#[cfg(unix)]
use std::ffi::OsString;
#[cfg(unix)]
use std::os::unix::ffi::OsStringExt;

#[derive(Debug, Default, Clone, Copy)]
pub struct PosixTraversal;

impl PosixTraversal {
    #[must_use]
    pub fn is_available() -> bool {
        cfg!(unix)
    }
}

impl TraversalStrategy for PosixTraversal {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Posix
    }

    fn is_supported(&self) -> bool {
        Self::is_available()
    }

    fn traverse(&self, root: &Path, context: &mut TraversalContext) -> Result<()> {
        #[cfg(unix)]
        {
            posix_traverse(root, context)
        }

        #[cfg(not(unix))]
        {
            log::debug!("PosixTraversal invoked on non-Unix platform; falling back to legacy");
            super::legacy::LegacyTraversal.traverse(root, context)
        }
    }
}

#[cfg(unix)]
fn dir_flags() -> OFlags {
    OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC
}

#[cfg(unix)]
fn posix_traverse(root: &Path, context: &mut TraversalContext) -> Result<()> {
    let dir_fd = match rfs::openat(rfs::CWD, root, dir_flags(), Mode::empty()) {
        Ok(fd) => fd,
        Err(err) => {
            context.record_error(root, &std::io::Error::from(err));
            return Ok(());
        }
    };

    traverse_directory_fd(root, &dir_fd, 0, context)
}

#[cfg(unix)]
fn traverse_directory_fd(
    current: &Path,
    dir_fd: &OwnedFd,
    depth: u32,
    context: &mut TraversalContext,
) -> Result<()> {
    let dir_iter = match Dir::read_from(dir_fd) {
        Ok(dir) => dir,
        Err(err) => {
            context.record_error(current, &std::io::Error::from(err));
            return Ok(());
        }
    };

    for entry_result in dir_iter {
        context.check_cancelled()?;

        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                context.record_error(current, &std::io::Error::from(err));
                continue;
            }
        };

        let name_bytes = entry.file_name().to_bytes();
        if name_bytes == b"." || name_bytes == b".." {
            continue;
        }

        let child_name = OsString::from_vec(name_bytes.to_vec());
        let child_path = current.join(&child_name);

        if context.visit(&child_path, depth + 1) != Visit::Descend {
            continue;
        }

        let child_fd = match rfs::openat(dir_fd, Path::new(&child_name), dir_flags(), Mode::empty()) {
            Ok(fd) => fd,
            Err(err) => {
                context.record_error(&child_path, &std::io::Error::from(err));
                continue;
            }
        };

        traverse_directory_fd(&child_path, &child_fd, depth + 1, context)?;
    }

    log::debug!("Finished directory {} (depth {depth})", current.display());
    context.register_directory_progress();
    Ok(())
}
