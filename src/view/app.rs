use super::Message;
use crate::controller::rfid::Command;
use crate::controller::Event;
use crate::model::{ConnectionState, Model};
use egui::Layout;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

pub struct App {
    model: Arc<Mutex<Model>>,
    controller: mpsc::Sender<Event>,
}

impl App {
    pub fn new(model: Arc<Mutex<Model>>, controller: mpsc::Sender<Event>) -> Self {
        Self { model, controller }
    }

    fn send(self: &Self, message: Message) {
        if self.controller.send(message.into()).is_err() {
            log::error!("Controller is not running");
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let model = match self.model.lock() {
            Ok(model) => model,
            Err(poisoned) => poisoned.into_inner(),
        };

        egui::TopBottomPanel::top(0).show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 8.;

            ui.with_layout(Layout::top_down(egui::Align::Min), |ui| {
                ui.heading("tagwave RFID Control");

                ui.label("Connection");
                ui.with_layout(Layout::left_to_right(), |ui| {
                    let mut selected_port = model.selected_port.clone();
                    egui::ComboBox::from_id_source(1)
                        .width(160.)
                        .selected_text(selected_port.as_str())
                        .show_ui(ui, |ui| {
                            for port in &model.ports {
                                ui.selectable_value(&mut selected_port, port.clone(), port.clone());
                            }
                        });
                    if selected_port != model.selected_port {
                        self.send(Message::SelectPort(selected_port.clone()));
                    }

                    if ui.button("Refresh").clicked() {
                        self.send(Message::RefreshPorts);
                    }

                    let toggle = if model.is_connected() { "Disconnect" } else { "Connect" };
                    if ui.button(toggle).clicked() {
                        if model.is_connected() {
                            self.send(Message::Disconnect);
                        } else {
                            self.send(Message::ConnectToPort(selected_port));
                        }
                    }

                    ui.with_layout(Layout::right_to_left(), |ui| {
                        ui.label(match &model.connection {
                            ConnectionState::Connected(port) => format!("Connected to {}", port),
                            ConnectionState::Connecting(port) => format!("Connecting to {}", port),
                            ConnectionState::Disconnecting(_) => "Disconnecting".into(),
                            ConnectionState::Disconnected => "Disconnected".into(),
                        });
                    });
                });
            });
        });

        egui::TopBottomPanel::bottom(1)
            .default_height(128.)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom()
                    .auto_shrink([false, false])
                    .max_height(128.)
                    .show(ui, |ui| {
                        ui.with_layout(Layout::top_down_justified(egui::Align::LEFT), |ui| {
                            for entry in &model.messages {
                                ui.monospace(entry.to_string());
                            }
                        })
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Commands");
            for command in Command::ALL {
                let button = egui::Button::new(command.label());
                if ui.add_sized([ui.available_width(), 24.], button).clicked() {
                    self.send(Message::Send(command));
                }
            }
        });
    }
}
