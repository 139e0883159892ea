use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

pub mod connection;
mod reader;
pub mod rfid;
pub mod serial;
pub mod simulator;
mod sink;

#[cfg(test)]
mod testing;

use crate::model::Model;
use crate::view;
use connection::ConnectionManager;
use serial::{Connector, LineSettings};
use sink::LogSink;

/// Everything the controller loop reacts to: operator commands from the view
/// and log lines marshaled from the connection and its reader thread.
#[derive(Debug)]
pub enum Event {
    Command(view::Message),
    Log(String),
}

impl From<view::Message> for Event {
    fn from(message: view::Message) -> Self {
        Event::Command(message)
    }
}

pub struct Controller {
    model: Arc<Mutex<Model>>,
    ctx: egui::Context,
    rx: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,

    manager: ConnectionManager,
}

impl Controller {
    pub fn new(
        model: Arc<Mutex<Model>>,
        ctx: egui::Context,
        connector: Box<dyn Connector>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let manager = ConnectionManager::new(
            connector,
            LineSettings::default(),
            LogSink::new(tx.clone()),
        );
        Controller {
            model,
            ctx,
            rx,
            tx,
            manager,
        }
    }

    pub fn start(self: Self) {
        thread::spawn(move || self.task());
    }

    pub fn get_command_channel(self: &Self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    fn modify_model<F>(self: &Self, mut op: F)
    where
        F: FnMut(&mut Model),
    {
        match self.model.lock() {
            Ok(mut model) => op(&mut model),
            Err(_) => log::error!("Model lock poisoned, update dropped"),
        }
        self.ctx.request_repaint();
    }

    fn task(mut self: Self) {
        self.refresh_ports();

        while let Ok(event) = self.rx.recv() {
            self.handle(event);
        }

        log::info!("Command channel closed, controller exiting");
    }

    /// Handles every event already queued, without waiting for more.
    #[cfg(test)]
    fn pump(self: &mut Self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
        }
    }

    fn handle(self: &mut Self, event: Event) {
        use view::Message::*;
        match event {
            Event::Log(line) => self.notify(line),

            Event::Command(RefreshPorts) => self.refresh_ports(),

            Event::Command(SelectPort(port)) => {
                self.modify_model(|m| m.selected_port = port.clone());
            }

            Event::Command(ConnectToPort(port)) => {
                // Failures already reached the operator through the log
                if let Ok(connection) = self.manager.connect(port.as_str()) {
                    log::debug!("Reader attached to {}", connection.port());
                }
                self.sync_connection();
            }

            Event::Command(Disconnect) => {
                self.manager.disconnect();
                self.sync_connection();
            }

            Event::Command(Send(command)) => {
                self.manager.send(command).ok();
            }
        }
    }

    fn refresh_ports(self: &Self) {
        let ports = self.manager.available_ports();
        log::info!("Found {} serial port(s)", ports.len());
        self.modify_model(|m| m.set_ports(ports.clone()));
    }

    fn sync_connection(self: &Self) {
        let state = self.manager.state().clone();
        self.modify_model(|m| m.connection = state.clone());
    }

    fn notify(self: &Self, msg: String) {
        self.modify_model(|m| m.message(msg.clone()))
    }
}
