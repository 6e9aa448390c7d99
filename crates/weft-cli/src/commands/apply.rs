//! Apply command
//!
//! Usage: weft apply <BASE> <PATCH> [--pretty]

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use weft_core::errors::{ExError, ExErrorKind};
use weft_core::patch::{apply_patch, Patch};
use weft_core::{log_op_end, log_op_error, log_op_start};

use super::{read_entity, to_json};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON document the patch applies to
    pub base: PathBuf,

    /// Patch as printed by `weft diff`
    pub patch: PathBuf,

    /// Pretty-print the result
    #[arg(long)]
    pub pretty: bool,
}

pub fn execute(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    log_op_start!("cli_apply", base = %args.base.display(), patch = %args.patch.display());

    let base = read_entity(&args.base)?;
    let patch_text = std::fs::read_to_string(&args.patch).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("cli_apply")
            .with_path(args.patch.display().to_string())
            .with_message(e.to_string())
    })?;
    let patch: Patch = serde_json::from_str(&patch_text)?;

    let result = match apply_patch(&base, &patch.ops) {
        Ok(result) => result,
        Err(e) => {
            log_op_error!(
                "cli_apply",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                op_count = patch.len()
            );
            return Err(e.into());
        }
    };

    println!("{}", to_json(&result, args.pretty)?);

    log_op_end!(
        "cli_apply",
        duration_ms = start.elapsed().as_millis() as u64,
        op_count = patch.len()
    );
    Ok(())
}
