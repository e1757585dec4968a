use anyhow::{Result, anyhow};
use pico_args::Arguments;
use std::{env, path::PathBuf};

use crate::config::ConfigState;
use crate::gestures::{AxisClassifier, PointerClassifier, TouchClassifier, movement_angle};
use crate::layout::{FixedLayout, track_offset};
use crate::replay;
use crate::tracker::{GestureSample, Point};

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // No args -> general help
    if env::args().len() == 1 {
        print_help();
        return Ok(());
    }

    if pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    // First free arg is the subcommand
    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.free_from_str().ok();
            if let Some(t) = topic {
                print_subcmd_help(&t);
            } else {
                print_help();
            }
            Ok(())
        }

        Some("replay") => {
            let profile_name: Option<String> = pargs.opt_value_from_str("--profile")?;
            let path: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: swipedeck replay <trace> [--profile <name>]"))?;
            let cfg = ConfigState::load_or_install_default()?;
            let profile = match profile_name {
                Some(name) => cfg.profile_named(&name)?,
                None => cfg.profile,
            };
            let trace = replay::load_trace(&path)?;
            let report = replay::run_trace(&trace, &profile)?;
            print_response(&serde_json::to_value(&report)?);
            Ok(())
        }

        Some("classify") => {
            let pointer = pargs.contains("--pointer");
            let dx: f32 = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: swipedeck classify <dx> <dy> [--pointer]"))?;
            let dy: f32 = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: swipedeck classify <dx> <dy> [--pointer]"))?;
            let cfg = ConfigState::load_or_install_default()?;
            let th = cfg.profile.thresholds.clone();
            let sample = GestureSample {
                start: Point::default(),
                current: Point::new(dx, dy),
            };
            let verdict = if pointer {
                PointerClassifier::new(th).classify(&sample)
            } else {
                TouchClassifier::new(th).classify(&sample)
            };
            print_response(&serde_json::json!({
                "input": if pointer { "pointer" } else { "touch" },
                "angle_deg": movement_angle(dx.abs(), dy.abs()),
                "axis": verdict.axis,
                "prevent_default": verdict.prevent_default,
            }));
            Ok(())
        }

        Some("offset") => {
            let card_width: f32 = pargs.value_from_str("--card")?;
            let gap: f32 = pargs.value_from_str("--gap")?;
            let container_width: f32 = pargs.value_from_str("--container")?;
            let padding_left: f32 = pargs.opt_value_from_str("--padding")?.unwrap_or(0.0);
            let index: usize = pargs.free_from_str().map_err(|_| {
                anyhow!("usage: swipedeck offset <index> --card <w> --gap <g> --container <c>")
            })?;
            let layout = FixedLayout {
                card_width,
                gap,
                padding_left,
                container_width,
            };
            let offset = track_offset(index, &layout);
            print_response(&serde_json::json!({
                "index": index,
                "offset": offset,
                "transform": crate::render::transform_css(offset),
            }));
            Ok(())
        }

        Some("use") => {
            let name: String = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: swipedeck use <profile_name>"))?;
            let mut cfg = ConfigState::load_or_install_default()?;
            cfg.set_active(&name)?;
            print_response(&serde_json::json!({"ok": true, "active_profile": cfg.active_name}));
            Ok(())
        }

        Some("list") => {
            let cfg = ConfigState::load_or_install_default()?;
            print_response(&serde_json::json!({
                "profiles": cfg.list_profiles(),
                "active": cfg.active_name,
            }));
            Ok(())
        }

        Some("show") => {
            let cfg = ConfigState::load_or_install_default()?;
            print_response(&serde_json::to_value(&cfg.profile)?);
            Ok(())
        }

        Some("doctor") => {
            let cfg = ConfigState::load_or_install_default()?;
            print_response(&cfg.doctor_report());
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!(
        r#"swipedeck — looped carousel gesture engine

USAGE:
  swipedeck help [command]                      Show general or command-specific help
  swipedeck replay <trace> [--profile <name>]   Replay an input trace, print the report
  swipedeck classify <dx> <dy> [--pointer]      Classify one gesture displacement
  swipedeck offset <index> --card <w> --gap <g> --container <c> [--padding <p>]
                                                Compute the track offset for a slot
  swipedeck use <name>                          Switch active profile
  swipedeck list                                List profiles
  swipedeck show                                Print the active profile
  swipedeck doctor                              Check profiles and config paths

TIPS:
  - Profiles: ~/.config/swipedeck/profiles
  - Active profile pointer: ~/.config/swipedeck/active
  - Traces are JSON, or TOML when the file ends in .toml
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "replay" => println!(
            "usage: swipedeck replay <trace> [--profile <name>]\nFeeds every trace step through the carousels and prints dispositions, effects and final state."
        ),
        "classify" => println!(
            "usage: swipedeck classify <dx> <dy> [--pointer]\nRuns the touch (or pointer) axis classifier on one displacement."
        ),
        "offset" => println!(
            "usage: swipedeck offset <index> --card <w> --gap <g> --container <c> [--padding <p>]\nPrints the translation that centers slot <index>."
        ),
        "use" => {
            println!("usage: swipedeck use <name>\nSwitches active profile to <name>.")
        }
        "list" => {
            println!("usage: swipedeck list\nLists available profiles and the active one.")
        }
        "show" => println!("usage: swipedeck show\nPrints the active profile as JSON."),
        "doctor" => println!(
            "usage: swipedeck doctor\nValidates every profile and shows config paths and thresholds."
        ),
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}

fn print_response(v: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(v).unwrap_or_default());
}
