use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use dx_compiler::{compile_source, SymbolRegistry, BASE_LANGUAGE};
use dx_core::CompileError;
use log::{debug, info};
use thiserror::Error;
use walkdir::WalkDir;

const EXIT_COMPILE_ERROR: i32 = 1;
// EX_SOFTWARE; clap already uses 2 for usage errors, which are user input.
const EXIT_INTERNAL_ERROR: i32 = 70;

#[derive(Debug, Parser)]
#[command(name = "dx-eventgen")]
#[command(about = "Compiles declarative event documents into Taikou Risshiden V editor script")]
struct Cli {
    input: PathBuf,
    output: PathBuf,
    #[arg(long = "enums-dir", default_value = "enums")]
    enums_dir: PathBuf,
    #[arg(long = "legacy-enums-dir")]
    legacy_enums_dir: Option<PathBuf>,
    #[arg(long = "lang", default_value = BASE_LANGUAGE)]
    lang: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // User-input failures exit 1; anything that panics is a tool defect and
    // exits 70 so callers can tell the two apart.
    let exit_code = match std::panic::catch_unwind(|| run(&cli)) {
        Ok(Ok(())) => 0,
        Ok(Err(error)) => {
            eprintln!("error: {}", error);
            EXIT_COMPILE_ERROR
        }
        Err(panic) => {
            eprintln!("internal error: {}", describe_panic(panic.as_ref()));
            EXIT_INTERNAL_ERROR
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let primary = read_category_sources(&cli.enums_dir)?;
    let legacy = match &cli.legacy_enums_dir {
        Some(dir) => read_category_sources(dir)?,
        None => BTreeMap::new(),
    };
    debug!(
        "loaded {} primary and {} legacy category files",
        primary.len(),
        legacy.len()
    );

    let registry = SymbolRegistry::from_json_maps(&primary, &legacy)?;

    let source = fs::read_to_string(&cli.input).map_err(|source| CliError::Io {
        path: cli.input.clone(),
        source,
    })?;

    let file_id = cli.input.display().to_string();
    let compiled = compile_source(&file_id, &source, &registry, &cli.lang)?;

    // Compilation fully succeeded; only now touch the output path.
    write_utf16le(&cli.output, &compiled)?;
    info!("generated {}", cli.output.display());
    Ok(())
}

fn read_category_sources(dir: &Path) -> Result<BTreeMap<String, String>, CliError> {
    if !dir.is_dir() {
        return Err(CliError::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "enum directory does not exist"),
        });
    }

    let mut sources = BTreeMap::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|extension| extension.to_str()) != Some("json") {
            continue;
        }

        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        sources.insert(path.display().to_string(), content);
    }

    Ok(sources)
}

// The target editor only accepts UTF-16LE with a byte-order marker.
fn write_utf16le(path: &Path, text: &str) -> Result<(), CliError> {
    let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    fs::write(path, bytes).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn describe_panic(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn write_utf16le_emits_bom_then_little_endian_units() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        write_utf16le(&path, "章A").expect("write");

        let bytes = fs::read(&path).expect("read");
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        // 章 is U+7AE0, A is U+0041.
        assert_eq!(&bytes[2..], &[0xE0, 0x7A, 0x41, 0x00]);
    }

    #[test]
    fn read_category_sources_collects_only_json_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("characters.json"), "{}").expect("write");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");
        fs::create_dir(dir.path().join("extra")).expect("mkdir");
        fs::write(dir.path().join("extra/bgm.json"), "{}").expect("write");

        let sources = read_category_sources(dir.path()).expect("sources");
        assert_eq!(sources.len(), 2);
        assert!(sources.keys().any(|path| path.ends_with("characters.json")));
        assert!(sources.keys().any(|path| path.ends_with("bgm.json")));
    }

    #[test]
    fn missing_enum_directory_is_reported_as_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no-such-dir");
        let error = read_category_sources(&missing).expect_err("error");
        assert!(matches!(error, CliError::Io { .. }));
    }
}
