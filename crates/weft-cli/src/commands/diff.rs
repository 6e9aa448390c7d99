//! Diff command
//!
//! Usage: weft diff <OLD> <NEW> [--pretty] [--target-type <ID>]

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use weft_core::patch::{PatchBuilder, PatchPath};
use weft_core::{diff, log_op_end, log_op_error, log_op_start};

use super::{read_entity, to_json};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// JSON document to diff from
    pub old: PathBuf,

    /// JSON document to diff to
    pub new: PathBuf,

    /// Pretty-print the patch
    #[arg(long)]
    pub pretty: bool,

    /// Target type id stamped on the patch
    #[arg(long = "target-type")]
    pub target_type: Option<String>,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    log_op_start!("cli_diff", old = %args.old.display(), new = %args.new.display());

    let old = read_entity(&args.old)?;
    let new = read_entity(&args.new)?;

    let mut builder = PatchBuilder::new();
    if let Some(target) = args.target_type {
        builder = builder.with_target_type_id(target);
    }
    if let Err(e) = diff(&old, &new, &PatchPath::root(), &mut builder) {
        log_op_error!(
            "cli_diff",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        return Err(e.into());
    }
    let patch = builder.finish();

    println!("{}", to_json(&patch, args.pretty)?);

    log_op_end!(
        "cli_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        op_count = patch.len()
    );
    Ok(())
}
