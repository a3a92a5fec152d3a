//! `curator new "<name>"` — scaffold a record file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use curator_core::corpus::{self, DEFAULT_CORPUS_DIR};

/// Arguments for `curator new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Free-text resource name, e.g. "The Rust Book". The file name is
    /// derived from it.
    pub name: String,

    /// Directory holding the record files.
    #[arg(long, default_value = DEFAULT_CORPUS_DIR)]
    pub dir: PathBuf,
}

impl NewArgs {
    pub async fn run(self) -> Result<()> {
        let path = corpus::scaffold_at(&self.dir, &self.name)
            .await
            .with_context(|| format!("cannot scaffold a record for '{}'", self.name))?;

        println!("✓ Created {}", path.display());
        println!("  Fill in the fields, then run `curator validate`.");
        Ok(())
    }
}
