//! Application entry point logic: load the inputs named on the command line, run the analysis
//! and write the profile.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use expanduser::expanduser;
use tracing::{event, Level};

use crate::analysis;
use crate::cli::CommandLineArgs;
use crate::error::FuncTreeError;

/// Run an analysis as described by the command line arguments.
pub fn run(args: &CommandLineArgs) -> Result<(), FuncTreeError> {
    // Reject invalid requests before touching any input.
    let request = args.request()?;
    let missing = args.missing();

    let hierarchy = analysis::read_hierarchy(&expand_path(&args.tree)?)?;
    let table = analysis::read_table(
        &expand_path(&args.input)?,
        args.compression,
        missing.as_ref(),
    )?;
    let profile = analysis::perform_basic(&request, &hierarchy, &table, args.use_rayon)?;

    match &args.output {
        Some(output) => {
            let path = expand_path(output)?;
            let mut writer = BufWriter::new(File::create(&path)?);
            profile.write_json(&mut writer, args.pretty)?;
            writer.flush()?;
            event!(Level::INFO, "Wrote profile {} to {}", profile.profile_id, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            profile.write_json(&mut writer, args.pretty)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Expand a leading `~` in a user supplied path.
fn expand_path(path: &str) -> Result<PathBuf, FuncTreeError> {
    Ok(expanduser(path)?)
}
