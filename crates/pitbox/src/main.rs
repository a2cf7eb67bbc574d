//! `pitbox` - CLI for the garage toolkit
//!
//! This binary decodes NGK spark-plug designations, records sensor sessions
//! through the ESP32 tap harness, and renders the dyno reference sheets.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write as _;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};

use pitbox::cli::{
    Cli, Command, ConfigCommand, DecodeCommand, DynoCommand, LogCommand, TableKind, TablesCommand,
};
use pitbox::dyno::{self, DynoSheet};
use pitbox::link::{TapMonitor, TapMonitorConfig};
use pitbox::plug::{self, tables};
use pitbox::session::SessionLog;
use pitbox::{init_logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Decode(cmd) => handle_decode(&cmd),
        Command::Tables(cmd) => {
            handle_tables(&cmd);
            Ok(())
        }
        Command::Log(cmd) => handle_log(&config, &cmd).await,
        Command::Dyno(cmd) => handle_dyno(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_decode(cmd: &DecodeCommand) -> anyhow::Result<()> {
    let Some(decoded) = plug::decode(&cmd.code) else {
        anyhow::bail!("nothing to decode: the designation is empty");
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    println!("Designation: {}", decoded.original);
    println!("--------------------------------------------------");

    println!("Thread:");
    match decoded.thread_spec() {
        Some(spec) => println!("  {} -> {} (hex {})", spec.key, spec.diameter, spec.hex),
        None => println!("  not recognized"),
    }
    println!();

    println!("Heat rating:");
    match (decoded.heat, decoded.heat_rating()) {
        (Some(value), Some(rating)) => {
            println!("  {} -> {} ({})", value, rating.category, rating.usage);
        }
        (Some(value), None) => println!("  {value} -> not in the heat table"),
        (None, _) => println!("  not recognized"),
    }
    println!();

    println!("Construction:");
    if decoded.construction.is_empty() {
        println!("  standard (no special features)");
    } else {
        for key in &decoded.construction {
            if let Some(desc) = tables::construction_description(key) {
                println!("  {key:<3} -> {desc}");
            }
        }
    }
    println!();

    println!("Thread reach:");
    match decoded.reach {
        Some(key) => {
            let desc = tables::reach_description(key).unwrap_or("");
            println!("  {key:<3} -> {desc}");
        }
        None => println!("  standard"),
    }
    println!();

    println!("Electrodes:");
    if decoded.electrodes.is_empty() {
        println!("  standard electrode");
    } else {
        for key in &decoded.electrodes {
            if let Some(desc) = tables::electrode_description(key) {
                println!("  {key:<3} -> {desc}");
            }
        }
    }

    Ok(())
}

fn handle_tables(cmd: &TablesCommand) {
    match cmd.table {
        Some(TableKind::Heat) => print_heat_table(),
        Some(TableKind::Thread) => print_thread_table(),
        Some(TableKind::Codes) => print_codes_overview(),
        None => {
            print_heat_table();
            println!();
            print_thread_table();
            println!();
            print_codes_overview();
        }
    }
}

fn print_heat_table() {
    println!("Heat ratings");
    println!("{:=<72}", "");
    println!(
        "{:<5} | {:<12} | {:<16} | {:<30}",
        "Value", "Category", "Temperature", "Typical use"
    );
    println!("{:-<72}", "");
    for rating in tables::HEAT_RATINGS {
        println!(
            "{:<5} | {:<12} | {:<16} | {:<30}",
            rating.value, rating.category, rating.temperature, rating.usage
        );
    }
}

fn print_thread_table() {
    println!("Thread codes (first character)");
    println!("{:=<50}", "");
    println!("{:<4} | {:<22} | {:<10}", "Code", "Diameter", "Hex");
    println!("{:-<50}", "");
    for spec in tables::THREAD_CODES {
        println!("{:<4} | {:<22} | {:<10}", spec.key, spec.diameter, spec.hex);
    }
}

fn print_codes_overview() {
    println!("Construction codes:");
    for entry in tables::CONSTRUCTION_CODES {
        println!("  {:<3} -> {}", entry.key, entry.description);
    }
    println!();

    println!("Thread-reach codes:");
    for entry in tables::REACH_CODES {
        println!("  {:<3} -> {}", entry.key, entry.description);
    }
    println!();

    println!("Electrode codes:");
    for entry in tables::ELECTRODE_CODES {
        println!("  {:<3} -> {}", entry.key, entry.description);
    }
}

async fn handle_log(config: &Config, cmd: &LogCommand) -> anyhow::Result<()> {
    let device = cmd
        .device
        .clone()
        .unwrap_or_else(|| config.link.device.clone());
    let minutes = cmd.minutes.unwrap_or(config.session.default_minutes);
    let output_dir = cmd.output.clone().unwrap_or_else(|| config.output_dir());
    let duration = Duration::from_secs(minutes * 60);

    println!("Opening tap harness on {}", device.display());
    let link = pitbox::link::open_serial(&device)?;

    // The ESP32 reboots when the port opens; give it time to come up.
    tokio::time::sleep(config.boot_delay()).await;

    let mut monitor = TapMonitor::with_config(
        link,
        TapMonitorConfig {
            poll_interval: config.poll_interval(),
        },
    );

    // One test round before committing to a session file.
    let probe = monitor.poll_once().context("tap harness did not answer")?;
    println!(
        "Tap check: {} rpm ({}), {:.1} C ({})",
        probe.rpm, probe.rpm_status, probe.temp_c, probe.temp_status
    );

    let mut session = SessionLog::create(&output_dir, chrono::Utc::now())?;
    println!(
        "Recording {} min to {} (Ctrl-C stops early)",
        minutes,
        session.path().display()
    );

    let handle = monitor.stop_handle();
    let (tx, mut rx) = mpsc::channel(100);
    let monitor_task = tokio::spawn(async move {
        let _ = monitor.start(tx).await;
    });

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            () = &mut deadline => {
                info!("session time is up");
                break;
            }
            result = tokio::signal::ctrl_c() => {
                let _ = result;
                println!();
                info!("interrupted, closing session");
                break;
            }
            sample = rx.recv() => {
                let Some(sample) = sample else { break };
                print!(
                    "\r{:>5} rpm | {:>6.1} C | {} samples",
                    sample.rpm,
                    sample.temp_c,
                    session.records() + 1
                );
                let _ = std::io::stdout().flush();
                if let Err(e) = session.append(&sample) {
                    warn!(error = %e, "dropped a sample");
                }
            }
        }
    }

    handle.stop();
    drop(rx);
    let _ = monitor_task.await;

    let summary = session.finish()?;
    println!();
    println!(
        "Session saved: {} ({} samples)",
        summary.path.display(),
        summary.records
    );
    Ok(())
}

fn handle_dyno(config: &Config, cmd: &DynoCommand) -> anyhow::Result<()> {
    let mut sheet = DynoSheet::load(config.dyno_path());

    match cmd {
        DynoCommand::Show => {
            print_setup_sheet();
            println!();
            print_performance_table(&sheet);
        }
        DynoCommand::Speeds => print_speed_table(),
        DynoCommand::Graph => print_power_graph(&sheet),
        DynoCommand::Edit { rpm, power, torque } => {
            sheet.set_point(*rpm, *power, *torque)?;
            sheet.save()?;
            println!("Saved: {rpm} rpm -> {power:.1} hp / {torque:.1} Nm");
        }
        DynoCommand::Reset { yes } => {
            if *yes {
                sheet.reset();
                sheet.save()?;
                println!("Tuned curve reset to stock.");
            } else {
                println!("This resets the tuned curve back to stock values.");
                println!("Use --yes to confirm.");
            }
        }
    }

    Ok(())
}

fn print_setup_sheet() {
    println!("Setup: stock ZX6R 600G vs. current tune");
    println!("{:=<70}", "");
    println!("{:<12} | {:<24} | {:<24}", "Component", "Stock", "Tuned");
    println!("{:-<70}", "");
    for item in dyno::SETUP_SHEET {
        println!(
            "{:<12} | {:<24} | {:<24}",
            item.component, item.stock, item.tuned
        );
    }
    println!();
    println!("Main jets one size down across the bank for the K&N filter:");
    println!("cleaner pickup, pulls to the {} rpm limiter.", dyno::REV_LIMIT);
}

fn print_performance_table(sheet: &DynoSheet) {
    println!("Performance: stock vs. tuned");
    println!("{:=<66}", "");
    println!(
        "{:>7} | {:>8} | {:>8} | {:>8} | {:>8} | {:>6}",
        "rpm", "stock hp", "stock Nm", "tune hp", "tune Nm", "d hp"
    );
    println!("{:-<66}", "");
    for stock in dyno::STOCK_CURVE {
        let tuned = sheet.tuned_at(stock.rpm).copied().unwrap_or(*stock);
        let delta = tuned.power_hp - stock.power_hp;
        let marker = if stock.rpm >= dyno::REV_LIMIT { "*" } else { " " };
        println!(
            "{:>6}{} | {:>8.1} | {:>8.1} | {:>8.1} | {:>8.1} | {:>+6.1}",
            stock.rpm, marker, stock.power_hp, stock.torque_nm, tuned.power_hp, tuned.torque_nm,
            delta
        );
    }
    println!("* = rev limiter");
}

fn print_speed_table() {
    println!("Speed per gear (km/h)");
    println!("{:=<70}", "");
    print!("{:>7} |", "rpm");
    for gear in 1..=dyno::GEARS {
        print!(" {gear:>6} |");
    }
    println!();
    println!("{:-<70}", "");
    for row in dyno::SPEED_TABLE {
        let marker = if row.rpm >= dyno::REV_LIMIT { "*" } else { " " };
        print!("{:>6}{marker} |", row.rpm);
        for (gear, speed) in row.kmh.iter().enumerate() {
            let cell = if dyno::MEASURED_SPEEDS.contains(&(row.rpm, gear)) {
                format!("{speed}+")
            } else {
                speed.to_string()
            };
            print!(" {cell:>6} |");
        }
        println!();
    }
    println!("+ = measured on the road, * = rev limiter");
}

fn print_power_graph(sheet: &DynoSheet) {
    const WIDTH: usize = 50;

    println!("Power curve (stock █, tuned ▒)");
    let max = sheet.max_power();
    for stock in dyno::STOCK_CURVE {
        let tuned = sheet.tuned_at(stock.rpm).copied().unwrap_or(*stock);
        let stock_bar = "█".repeat(dyno::scaled_width(stock.power_hp, max, WIDTH));
        let tuned_bar = "▒".repeat(dyno::scaled_width(tuned.power_hp, max, WIDTH));
        println!("{:>5}: {:<WIDTH$} {:>5.1} hp", stock.rpm, stock_bar, stock.power_hp);
        println!("{:>5}: {:<WIDTH$} {:>5.1} hp", "", tuned_bar, tuned.power_hp);
        println!();
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[link]");
                println!("  Device:          {}", config.link.device.display());
                println!("  Baud:            {}", config.link.baud);
                println!("  Poll interval:   {} ms", config.link.poll_interval_ms);
                println!("  Boot delay:      {} ms", config.link.boot_delay_ms);
                println!();
                println!("[session]");
                println!("  Output dir:      {}", config.output_dir().display());
                println!("  Default length:  {} min", config.session.default_minutes);
                println!();
                println!("[dyno]");
                println!("  Data path:       {}", config.dyno_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
