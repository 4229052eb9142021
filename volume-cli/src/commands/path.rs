use clap::Args;

use crate::cli::GlobalFlags;

/// Print the host data path of a volume
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Volume name
    pub name: String,
}

pub fn execute(args: PathArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;
    let volume = rt.get(&args.name)?;
    println!("{}", volume.path().display());
    Ok(())
}
