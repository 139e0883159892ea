#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

mod controller;
mod error;
mod model;
mod view;

use clap::Parser;
use controller::serial::{Connector, SerialConnector};
use controller::simulator::SimulatedBoard;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use view::app::App;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serial console for the tagwave RFID reader board")]
struct Args {
    /// Port to preselect after the initial scan
    #[arg(long)]
    port: Option<String>,

    /// Talk to a built-in simulated board instead of a real port
    #[arg(long)]
    simulate: bool,

    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Also write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .parse()
        .map_err(|_| format!("unknown log level '{}'", level))
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        args.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &args.log_file {
        loggers.push(WriteLogger::new(
            args.log_level,
            Config::default(),
            File::create(path)?,
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("Unable to start logging: {}", e);
    }

    let model = Arc::new(Mutex::new(model::Model::default()));

    let controller_model = Arc::clone(&model);
    let view_model = Arc::clone(&model);

    let connector: Box<dyn Connector> = if args.simulate {
        log::info!("Using the simulated board");
        Box::new(SimulatedBoard)
    } else {
        Box::new(SerialConnector)
    };

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(400., 350.)),
        min_window_size: Some(egui::vec2(400., 350.)),
        ..eframe::NativeOptions::default()
    };

    eframe::run_native(
        "tagwave RFID Control GUI",
        options,
        Box::new(move |cc| {
            let controller =
                controller::Controller::new(controller_model, cc.egui_ctx.clone(), connector);
            let tx = controller.get_command_channel();
            controller.start();
            if let Some(port) = args.port {
                tx.send(view::Message::SelectPort(port).into()).ok();
            }
            Box::new(App::new(view_model, tx))
        }),
    );
}
