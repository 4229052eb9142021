use std::io::Write;

use anyhow::bail;
use boxlite_volume::VolumeInfo;
use clap::Args;

use crate::cli::GlobalFlags;
use crate::formatter::{OutputFormat, format_yaml, print_output};

/// Display detailed information on one or more volumes
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Output format (json or yaml)
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Volume names
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub fn execute(args: InspectArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;

    let mut infos = Vec::with_capacity(args.names.len());
    let mut failed = 0;
    for name in &args.names {
        match rt.inspect(name) {
            Ok(info) => infos.push(info),
            Err(e) => {
                eprintln!("Error: {e}");
                failed += 1;
            }
        }
    }

    if !infos.is_empty() {
        let mut stdout = std::io::stdout();
        // No table layout for inspect; render it as YAML.
        print_output(&mut stdout, &infos, args.format, |w, infos: &Vec<VolumeInfo>| {
            write!(w, "{}", format_yaml(infos)?)?;
            Ok(())
        })?;
    }

    if failed > 0 {
        bail!("failed to inspect {failed} volume(s)");
    }
    Ok(())
}
