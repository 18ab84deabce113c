//! # LDIF Compare
//!
//! Compares two LDIF files with the same comparator the fixture harness uses
//! and prints the first difference.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin ldif-compare expected.ldif actual.ldif
//! cargo run --bin ldif-compare expected.ldif export.ldif --root-dn dc=example,dc=com
//! cargo run --bin ldif-compare expected.ldif actual.ldif --ordered-values
//! ```
//!
//! ## Options
//!
//! - `--root-dn <DN>`: ignore the entry named `DN` in the actual file, as the
//!   harness does for a server's root context entry
//! - `--ordered-values`: treat the order of attribute values as significant
//!
//! ## Output Examples
//!
//! ```text
//! Comparing expected.ldif with actual.ldif
//! ✓ 3 entries match
//! ```
//!
//! ```text
//! Comparing expected.ldif with actual.ldif
//! ❌ Attributes differ for entry at index 0 ('cn=Alice,dc=example,dc=com'):
//! 	Expected: Attribute(name=cn, values={'Alicia'})
//! 	Actual: Attribute(name=cn, values={'Alice'})
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: The files hold the same entries
//! - `1`: The contents differ
//! - `2`: Bad arguments or a file could not be read or parsed

use ldapunit::compare::{self, CompareOptions, ValueOrder};
use ldapunit::entry::DirectoryEntry;
use ldapunit::ldif;
use std::env;
use std::fs::File;
use std::path::Path;
use std::process;

struct Arguments {
    expected: String,
    actual: String,
    root_dn: Option<String>,
    options: CompareOptions,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let arguments = match parse_arguments(args.get(1..).unwrap_or_default()) {
        Ok(arguments) => arguments,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            eprintln!(
                "Usage: {} <expected.ldif> <actual.ldif> [--root-dn DN] [--ordered-values]",
                args.first().map(String::as_str).unwrap_or("ldif-compare")
            );
            process::exit(2);
        }
    };

    println!(
        "Comparing {} with {}",
        arguments.expected, arguments.actual
    );

    let expected = load_or_exit(&arguments.expected);
    let mut actual = load_or_exit(&arguments.actual);
    if let Some(root_dn) = &arguments.root_dn {
        actual = compare::without_entry(actual, root_dn);
    }

    let count = expected.len();
    match compare::assert_entries_match_with(expected, actual, &arguments.options) {
        Ok(()) => println!("✓ {} entries match", count),
        Err(mismatch) => {
            eprintln!("❌ {}", mismatch);
            process::exit(1);
        }
    }
}

fn parse_arguments(args: &[String]) -> Result<Arguments, String> {
    let mut files = Vec::new();
    let mut root_dn = None;
    let mut options = CompareOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--root-dn" => {
                let dn = iter.next().ok_or("--root-dn needs a DN")?;
                root_dn = Some(dn.clone());
            }
            "--ordered-values" => options = options.with_value_order(ValueOrder::Ordered),
            flag if flag.starts_with("--") => return Err(format!("unknown option '{}'", flag)),
            file => files.push(file.to_string()),
        }
    }

    match <[String; 2]>::try_from(files) {
        Ok([expected, actual]) => Ok(Arguments {
            expected,
            actual,
            root_dn,
            options,
        }),
        Err(_) => Err("expected exactly two LDIF files".to_string()),
    }
}

fn load_or_exit(path: &str) -> Vec<DirectoryEntry> {
    match load(Path::new(path)) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: cannot load '{}': {}", path, e);
            process::exit(2);
        }
    }
}

fn load(path: &Path) -> Result<Vec<DirectoryEntry>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    Ok(ldif::read_entries(file)?)
}
