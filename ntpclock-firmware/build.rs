//! Build script for ntpclock-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_SSID_LEN: usize = 32;
const MAX_PASSWORD_LEN: usize = 64;
const MAX_NTP_SERVER_LEN: usize = 32;
const MAX_HOST_NAME_LEN: usize = 32;
const MAX_UTC_OFFSET_MINUTES: i64 = 14 * 60;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml at compile time
///
/// The firmware parses the same file at boot with its own minimal parser;
/// catching mistakes here keeps a bad default from ever being flashed.
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds clock.toml as its default configuration.    ║\n\
            ║  Please create one in the ntpclock-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_wifi(&config, &mut errors);
    validate_ntp(&config, &mut errors);
    validate_clock(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in clock.toml                      ║\n\
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

    println!("cargo:warning=clock.toml validated successfully");
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

/// Only `[wifi]`, `[ntp]` and `[clock]` tables are understood
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };

    for (name, value) in table {
        match (name.as_str(), value) {
            ("wifi" | "ntp" | "clock", toml::Value::Table(_)) => {}
            ("wifi" | "ntp" | "clock", _) => errors.push(format!("[{}] must be a table", name)),
            _ => errors.push(format!("unknown section [{}]", name)),
        }
    }
}

/// Reject keys the firmware parser would refuse
fn check_keys(section: &str, table: &toml::value::Table, known: &[&str], errors: &mut Vec<String>) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

fn check_string(
    section: &str,
    table: &toml::value::Table,
    key: &str,
    max_len: usize,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(s)) if s.len() > max_len => {
            errors.push(format!("[{}] {} longer than {} bytes", section, key, max_len));
        }
        Some(toml::Value::String(s)) if s.contains('"') => {
            errors.push(format!("[{}] {} must not contain quotes", section, key));
        }
        Some(toml::Value::String(_)) => {}
        Some(_) => errors.push(format!("[{}] {} must be a string", section, key)),
    }
}

fn check_integer(
    section: &str,
    table: &toml::value::Table,
    key: &str,
    range: core::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(n)) if !range.contains(n) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
        }
        Some(toml::Value::Integer(_)) => {}
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_wifi(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(wifi)) = config.get("wifi") else {
        return;
    };

    check_keys("wifi", wifi, &["ssid", "password"], errors);
    check_string("wifi", wifi, "ssid", MAX_SSID_LEN, errors);
    check_string("wifi", wifi, "password", MAX_PASSWORD_LEN, errors);
}

fn validate_ntp(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(ntp)) = config.get("ntp") else {
        return;
    };

    check_keys(
        "ntp",
        ntp,
        &["server", "init_update", "sync_update", "sync_valid"],
        errors,
    );
    check_string("ntp", ntp, "server", MAX_NTP_SERVER_LEN, errors);
    if let Some(toml::Value::String(server)) = ntp.get("server") {
        if server.is_empty() {
            errors.push("[ntp] server cannot be empty".to_string());
        }
    }
    check_integer("ntp", ntp, "init_update", 1..=i64::from(u32::MAX), errors);
    check_integer("ntp", ntp, "sync_update", 1..=i64::from(u32::MAX), errors);
    check_integer("ntp", ntp, "sync_valid", 1..=i64::from(u8::MAX), errors);
}

fn validate_clock(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(clock)) = config.get("clock") else {
        return;
    };

    check_keys("clock", clock, &["host_name", "utc_offset_minutes", "dst"], errors);
    check_string("clock", clock, "host_name", MAX_HOST_NAME_LEN, errors);
    check_integer(
        "clock",
        clock,
        "utc_offset_minutes",
        -MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES,
        errors,
    );

    match clock.get("dst") {
        None => {}
        Some(toml::Value::String(rule)) => {
            if !["none", "eu", "us"].contains(&rule.as_str()) {
                errors.push("[clock] dst must be 'none', 'eu', or 'us'".to_string());
            }
        }
        Some(_) => errors.push("[clock] dst must be a string".to_string()),
    }
}
