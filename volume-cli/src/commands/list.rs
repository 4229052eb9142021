use std::io::Write;

use boxlite_volume::VolumeInfo;
use clap::Args;
use comfy_table::{Attribute, Cell, Table, presets};

use crate::cli::GlobalFlags;
use crate::formatter::{OutputFormat, print_output};

/// List volumes
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show volume names
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn execute(args: ListArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;
    let volumes: Vec<VolumeInfo> = rt.list().iter().map(|v| VolumeInfo::new(v.as_ref())).collect();

    if args.quiet {
        for info in &volumes {
            println!("{}", info.name);
        }
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    print_output(&mut stdout, &volumes, args.format, |w, volumes| {
        writeln!(w, "{}", table(volumes))?;
        Ok(())
    })
}

fn table(volumes: &[VolumeInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("DRIVER").add_attribute(Attribute::Bold),
        Cell::new("VOLUME NAME").add_attribute(Attribute::Bold),
    ]);

    for info in volumes {
        table.add_row(vec![info.driver.clone(), info.name.clone()]);
    }
    table
}
