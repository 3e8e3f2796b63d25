//! Build script for slit-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in the [timing] table
const TIMING_KEYS: [&str; 10] = [
    "paper_timeout_ms",
    "plastic_timeout_ms",
    "top_open_ms",
    "top_close_ms",
    "metal_down_ms",
    "metal_up_ms",
    "plastic_down_ms",
    "plastic_up_ms",
    "pulse_ms",
    "debounce_ms",
];

/// Keys that may be zero
const OPTIONAL_ZERO: [&str; 1] = ["debounce_ms"];

/// Shortest tone on the sound module (ms); a pulse must fit inside it
const SHORTEST_TONE_MS: i64 = 2150;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate machine.toml configuration at compile time
fn validate_config() {
    // Re-run if machine.toml changes
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a machine.toml configuration file.        ║\n\
            ║  Please create one in the slit-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read machine.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in machine.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_timing(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid [timing] table in machine.toml                   ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=machine.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate the [timing] table
fn validate_timing(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let timing = match config.get("timing") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[timing] must be a table".to_string());
            return errors;
        }
        None => {
            errors.push("Missing [timing] section".to_string());
            return errors;
        }
    };

    for (key, value) in timing {
        if !TIMING_KEYS.contains(&key.as_str()) {
            errors.push(format!("[timing] unknown key '{}'", key));
            continue;
        }

        let ms = match value {
            toml::Value::Integer(ms) => *ms,
            _ => {
                errors.push(format!("[timing] '{}' must be an integer", key));
                continue;
            }
        };

        if ms < 0 || ms > u32::MAX as i64 {
            errors.push(format!("[timing] '{}' out of range", key));
        } else if ms == 0 && !OPTIONAL_ZERO.contains(&key.as_str()) {
            errors.push(format!("[timing] '{}' must be positive", key));
        }
    }

    if let Some(toml::Value::Integer(pulse)) = timing.get("pulse_ms") {
        if *pulse > SHORTEST_TONE_MS {
            errors.push(format!(
                "[timing] pulse_ms must not exceed {} ms",
                SHORTEST_TONE_MS
            ));
        }
    }

    errors
}
