//! Reads sources, runs the transforms and writes the results.
//!
//! Two modes:
//! - single input: a file or standard input, written to `--out-file` or
//!   standard output;
//! - `--replace`: every matching `.js` file is rewritten in place. Files are
//!   independent units and run in parallel, each with its own arena and
//!   warning list; their reports are printed afterwards in path order.

use crate::args::CliArgs;
use crate::reporter::Reporter;
use anyhow::{Context, Result, bail};
use globset::Glob;
use rayon::prelude::*;
use remod::{TransformSet, Warning, transform_source};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};
use walkdir::WalkDir;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// The streams the driver talks to; the binary passes the process ones.
pub struct Io<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// Run one invocation and return its exit status.
///
/// Problems with the input itself (unknown transform, unparsable source)
/// are reported on `stderr` and mapped to [`EXIT_FAILURE`]; an `Err` means
/// the driver could not do its own I/O.
pub fn run(args: &CliArgs, reporter: &Reporter, io: &mut Io<'_>) -> Result<i32> {
    let transforms = match TransformSet::parse(&args.transform_list()) {
        Ok(transforms) => transforms,
        Err(err) => {
            writeln!(io.stderr, "{err}")?;
            return Ok(EXIT_FAILURE);
        }
    };

    match &args.replace {
        Some(target) => replace_in_place(target, &transforms, reporter, io.stderr),
        None => transform_single(args, &transforms, reporter, io),
    }
}

fn transform_single(
    args: &CliArgs,
    transforms: &TransformSet,
    reporter: &Reporter,
    io: &mut Io<'_>,
) -> Result<i32> {
    let name = args.file.as_ref().map(|path| path.display().to_string());
    let source = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut source = String::new();
            io.stdin
                .read_to_string(&mut source)
                .context("failed to read standard input")?;
            source
        }
    };

    let outcome = match transform_source(&source, transforms) {
        Ok(outcome) => outcome,
        Err(err) => {
            io.stderr
                .write_all(reporter.render_failure(name.as_deref(), &err).as_bytes())?;
            return Ok(EXIT_FAILURE);
        }
    };

    match &args.out_file {
        Some(path) => std::fs::write(path, &outcome.code)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            io.stdout.write_all(outcome.code.as_bytes())?;
            io.stdout.flush()?;
        }
    }
    io.stderr
        .write_all(reporter.render_warnings(name.as_deref(), &outcome.warnings).as_bytes())?;
    Ok(EXIT_SUCCESS)
}

// =============================================================================
// In-place mode
// =============================================================================

struct FileResult {
    path: PathBuf,
    warnings: Result<Vec<Warning>>,
}

fn replace_in_place(
    target: &str,
    transforms: &TransformSet,
    reporter: &Reporter,
    stderr: &mut dyn Write,
) -> Result<i32> {
    let files = collect_targets(target)?;
    let _span = info_span!("replace", files = files.len()).entered();

    let results: Vec<FileResult> = files
        .par_iter()
        .map(|path| FileResult {
            path: path.clone(),
            warnings: rewrite_file(path, transforms),
        })
        .collect();

    let mut status = EXIT_SUCCESS;
    for result in &results {
        let name = result.path.display().to_string();
        let rendered = match &result.warnings {
            Ok(warnings) => reporter.render_warnings(Some(&name), warnings),
            Err(err) => {
                status = EXIT_FAILURE;
                reporter.render_failure(Some(&name), err)
            }
        };
        stderr.write_all(rendered.as_bytes())?;
    }
    Ok(status)
}

/// Transform one file and write it back if anything changed.
fn rewrite_file(path: &Path, transforms: &TransformSet) -> Result<Vec<Warning>> {
    let source = std::fs::read_to_string(path).context("failed to read file")?;
    let outcome = transform_source(&source, transforms)?;
    if outcome.code != source {
        std::fs::write(path, &outcome.code).context("failed to write file")?;
    }
    debug!(
        path = %path.display(),
        changed = outcome.code != source,
        warnings = outcome.warnings.len(),
        "file processed"
    );
    Ok(outcome.warnings)
}

/// Files named by a `--replace` argument, sorted.
pub fn collect_targets(target: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(target);
    let mut files = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        js_files_under(path, |_| true)
    } else {
        let matcher = Glob::new(target)
            .with_context(|| format!("invalid pattern {target}"))?
            .compile_matcher();
        js_files_under(&glob_base(target), |file| {
            matcher.is_match(file.strip_prefix(".").unwrap_or(file))
        })
    };
    if files.is_empty() {
        bail!("no JavaScript files match {target}");
    }
    files.sort();
    Ok(files)
}

fn js_files_under(root: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|file| file.extension().is_some_and(|ext| ext == "js") && keep(file))
        .collect()
}

/// Longest leading run of path components without glob syntax.
fn glob_base(pattern: &str) -> PathBuf {
    let base: PathBuf = Path::new(pattern)
        .components()
        .take_while(|component| {
            !component
                .as_os_str()
                .to_string_lossy()
                .contains(['*', '?', '[', '{'])
        })
        .collect();
    if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_base() {
        assert_eq!(glob_base("src/**/*.js"), PathBuf::from("src"));
        assert_eq!(glob_base("*.js"), PathBuf::from("."));
        assert_eq!(glob_base("a/b/c?.js"), PathBuf::from("a/b"));
    }
}
