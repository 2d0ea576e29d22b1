use std::sync::Arc;

use serde::Serialize;

use kotori_core::conversion::ConversionEngine;
use kotori_core::settings::Settings;
use kotori_session::{CandidateUi, CandidateWindow, HostClient, InputController, MarkedText};

use super::{load_settings, open_engine, CliError};
use crate::script::parse_script;

/// Host stand-in that keeps committed text as surrounding context.
#[derive(Default)]
struct RecordingHost {
    committed: Vec<String>,
}

impl HostClient for RecordingHost {
    fn insert_text(&mut self, text: &str) {
        self.committed.push(text.to_string());
    }

    fn set_marked_text(&mut self, _marked: &MarkedText) {}

    fn surrounding_text(&mut self, max_chars: usize) -> Option<String> {
        let text: String = self.committed.concat();
        let skip = text.chars().count().saturating_sub(max_chars);
        Some(text.chars().skip(skip).collect()).filter(|t: &String| !t.is_empty())
    }

    fn override_keyboard_layout(&mut self, _layout_id: &str) {}

    fn switch_input_mode(&mut self, _mode_id: &str) {}
}

/// The window is read back from the controller after each step.
struct NullUi;

impl CandidateUi for NullUi {
    fn show(&mut self, _window: &CandidateWindow) {}

    fn hide(&mut self) {}
}

/// Observable session state after one scripted key.
#[derive(Debug, Serialize)]
pub struct SimStep {
    pub key: String,
    pub consumed: bool,
    pub state: String,
    pub mode: String,
    pub marked: String,
    pub selection: (usize, usize),
    pub committed: Vec<String>,
    pub window: &'static str,
    pub candidates: Vec<String>,
    pub selected: Option<usize>,
}

/// Run `script` through a controller and record every step.
pub fn simulate(
    engine: Arc<dyn ConversionEngine>,
    settings: Settings,
    script: &str,
) -> Result<Vec<SimStep>, CliError> {
    let keys = parse_script(script)?;
    let mut controller = InputController::new(engine, settings);
    let mut host = RecordingHost::default();
    let mut ui = NullUi;
    controller.activate(&mut host);

    let mut steps = Vec::with_capacity(keys.len());
    for key in keys {
        let before = host.committed.len();
        let consumed = controller.handle_event(&key.event, &mut host, &mut ui);
        let marked = controller.current_marked_text();
        let window = controller.candidate_window_state();
        steps.push(SimStep {
            key: key.label,
            consumed,
            state: format!("{:?}", controller.state()),
            mode: format!("{:?}", controller.input_mode()),
            marked: marked.text(),
            selection: (marked.selection.start, marked.selection.end),
            committed: host.committed[before..].to_vec(),
            window: match window {
                CandidateWindow::Hidden => "hidden",
                CandidateWindow::Composing { .. } => "composing",
                CandidateWindow::Selecting { .. } => "selecting",
            },
            candidates: window.candidates().iter().map(|c| c.text.clone()).collect(),
            selected: window.selection(),
        });
    }
    Ok(steps)
}

fn print_step(step: &SimStep) {
    let mut line = format!(
        "{:<10} {:<9} {:<9} marked={:?} sel={}..{}",
        step.key,
        if step.consumed { "consumed" } else { "passed" },
        step.state,
        step.marked,
        step.selection.0,
        step.selection.1,
    );
    if !step.committed.is_empty() {
        line.push_str(&format!(" commit={:?}", step.committed));
    }
    if step.window != "hidden" {
        let shown: Vec<String> = step
            .candidates
            .iter()
            .take(9)
            .enumerate()
            .map(|(i, c)| {
                if Some(i) == step.selected {
                    format!("[{c}]")
                } else {
                    c.clone()
                }
            })
            .collect();
        line.push_str(&format!(" {}: {}", step.window, shown.join(" ")));
    }
    println!("{line}");
}

pub fn simulate_cmd(
    dict_file: &str,
    script: &str,
    settings_file: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let engine = open_engine(dict_file)?;
    let settings = load_settings(settings_file)?;
    let steps = simulate(engine, settings, script)?;
    for step in &steps {
        if json {
            println!("{}", serde_json::to_string(step)?);
        } else {
            print_step(step);
        }
    }
    Ok(())
}
