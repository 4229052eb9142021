use anyhow::bail;
use boxlite_volume::VolumeOptions;
use clap::Args;

use crate::cli::GlobalFlags;

/// Create a volume
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Volume driver (local, tmpfs, generic)
    #[arg(short, long)]
    pub driver: Option<String>,

    /// Driver option, KEY=VALUE or a bare KEY (repeatable)
    #[arg(short = 'o', long = "opt", value_name = "KEY=VALUE")]
    pub opt: Vec<String>,

    /// Volume name
    pub name: String,
}

pub fn execute(args: CreateArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let options = parse_options(&args.opt)?;
    let rt = global.create_runtime()?;

    let volume = rt.create(&args.name, args.driver.as_deref(), &options)?;
    println!("{}", volume.name());
    Ok(())
}

/// A bare key maps to an empty value, which is how flags like `CoM` are passed.
fn parse_options(raw: &[String]) -> anyhow::Result<VolumeOptions> {
    let mut options = VolumeOptions::new();
    for item in raw {
        let (key, value) = item.split_once('=').unwrap_or((item.as_str(), ""));
        if key.is_empty() {
            bail!("invalid option {item:?}: empty key");
        }
        options.insert(key.to_string(), value.to_string());
    }
    Ok(options)
}
