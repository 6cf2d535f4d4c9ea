#![forbid(unsafe_code)]

//! Shared security helpers for the tubegrab binaries.

use anyhow::{Result, bail};
use nix::unistd::Uid;

/// Fails fast when a binary is started as root. The service writes wherever
/// the download directory points, so it is expected to run under a dedicated
/// unprivileged account.
pub fn ensure_not_root(process: &str) -> Result<()> {
    if Uid::current().is_root() {
        bail!("{process} must not be run as root; use an unprivileged service account");
    }
    Ok(())
}
