//! CLI definition and global flags for boxvol.

use std::path::PathBuf;

use boxlite_volume::{VolumeRuntime, VolumeRuntimeOptions};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "boxvol", author, version, about = "BoxLite volume manager")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a volume
    Create(crate::commands::create::CreateArgs),

    /// List volumes
    #[command(visible_alias = "ls")]
    List(crate::commands::list::ListArgs),

    /// Display detailed information on one or more volumes
    Inspect(crate::commands::inspect::InspectArgs),

    /// Remove one or more volumes
    Rm(crate::commands::rm::RmArgs),

    /// Print the host data path of a volume
    Path(crate::commands::path::PathArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GlobalFlags {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// BoxLite home directory
    #[arg(long, global = true, env = "BOXLITE_HOME")]
    pub home: Option<PathBuf>,

    /// Configuration file path (optional)
    ///
    /// JSON file with volume runtime options such as root_uid and root_gid.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl GlobalFlags {
    pub fn create_runtime(&self) -> anyhow::Result<VolumeRuntime> {
        let mut options = match &self.config {
            Some(path) => VolumeRuntimeOptions::load(path)?,
            None => VolumeRuntimeOptions::default(),
        };

        // --home wins over the config file
        if let Some(home) = &self.home {
            options.home_dir = home.clone();
        }

        tracing::debug!(home = %options.home_dir.display(), "Opening volume runtime");

        VolumeRuntime::new(options).map_err(Into::into)
    }
}
