use anyhow::bail;
use clap::Args;

use crate::cli::GlobalFlags;

/// Remove one or more volumes
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Volume names
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub fn execute(args: RmArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;

    let mut failed = 0;
    for name in &args.names {
        match rt.remove(name) {
            Ok(()) => println!("{name}"),
            Err(e) => {
                eprintln!("Error: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("failed to remove {failed} volume(s)");
    }
    Ok(())
}
