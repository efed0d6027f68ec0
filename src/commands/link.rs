//! Link command handler

use anyhow::{bail, Result};

use ytloop::cli::LinkArgs;
use ytloop::video::{resolve_input, INVALID_INPUT_MESSAGE};
use ytloop::Config;

/// Validate the input and print its loop link.
///
/// `--start`/`--end` override bounds carried by a loop link.
pub fn handle(args: LinkArgs) -> Result<()> {
    let mut link = match resolve_input(&args.input) {
        Ok(link) if link.video_id.is_some() => link,
        _ => bail!(INVALID_INPUT_MESSAGE),
    };
    if args.start.is_some() {
        link.start = args.start;
    }
    if args.end.is_some() {
        link.end = args.end;
    }

    let base = match args.base {
        Some(base) => base,
        None => Config::load()?.link.base_url,
    };
    println!("{}", link.to_url(&base));
    Ok(())
}
