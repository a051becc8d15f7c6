//! List the entries of an NSP and extract them into a directory.
//!
//! ```text
//! cargo run --example extract -- game.nsp out/
//! RUST_LOG=nspkit=trace cargo run --example extract -- game.nsp out/
//! ```

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use nspkit::{Container, DataOrigin, ReadOptions};
use tracing_subscriber::EnvFilter;

fn run(nsp: PathBuf, out: PathBuf) -> nspkit::Result<()> {
    let opts = ReadOptions::new()
        .verify_bounds(true)
        .data_origin(DataOrigin::AfterStringTable);
    let mut container = Container::with_options(nsp, opts);
    container.load_metadata()?;

    let dir = out.join(container.basename());
    fs::create_dir_all(&dir)?;

    for entry in container.entries() {
        println!("{:>4}  {:>12}  {}", entry.index, entry.size, entry.name);
        // Names come from the file; never let them escape the output dir.
        let Some(name) = std::path::Path::new(&entry.name).file_name() else {
            continue;
        };
        let mut w = BufWriter::new(File::create(dir.join(name))?);
        container.extract_to(entry.index, &mut w)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args_os().skip(1);
    let (Some(nsp), Some(out)) = (args.next(), args.next()) else {
        eprintln!("usage: extract <file.nsp> <output-dir>");
        return ExitCode::FAILURE;
    };

    match run(nsp.into(), out.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
