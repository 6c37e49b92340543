use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context, Vec2};

use crate::cases::{CaseRecord, FilterConfig, FilterValues, Snapshot, load_dataset};
use crate::layout::{ChartLayout, Grouping, PackEngine, SortMode};

mod chart;
mod highlight;
mod motion;
mod render_utils;
mod ui;

use highlight::HighlightStore;
use motion::Motion;

/// Startup settings resolved from the command line.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub sort: SortMode,
}

pub struct CaseChartApp {
    config: AppConfig,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Snapshot, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    base: Snapshot,
    filters: FilterConfig,
    filter_values: FilterValues,
    filter_options: Vec<Vec<String>>,
    filtered: Snapshot,
    list: Snapshot,
    list_rows: Vec<Arc<CaseRecord>>,
    list_index_by_id: HashMap<String, usize>,
    grouping: Grouping,
    engine: PackEngine,
    chart_dirty: bool,
    chart_revision: u64,
    chart_cache: Option<ChartCache>,
    quick_find: String,
    quick_find_cache: Option<QuickFindCache>,
    highlight: HighlightStore,
    detail: Option<String>,
    pan: Vec2,
    zoom: f32,
}

/// The last layout pass plus the bubbles animating towards it.
struct ChartCache {
    layout: ChartLayout,
    viewport: Vec2,
    bubbles: Vec<Bubble>,
    index_by_id: HashMap<String, usize>,
}

struct Bubble {
    id: String,
    record: Arc<CaseRecord>,
    motion: Motion,
    leaving: bool,
}

struct QuickFindCache {
    query: String,
    chart_revision: u64,
    matches: Arc<HashSet<usize>>,
}

impl CaseChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = Self::start_load(config.data_path.clone());
        Self { config, state }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<Result<Snapshot, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&data_path)
                .with_context(|| format!("failed to load case dataset {}", data_path.display()))
                .map_err(|error| {
                    let message = format!("{error:#}");
                    tracing::error!(%message, "dataset load failed");
                    message
                });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }
}

impl eframe::App for CaseChartApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(snapshot)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            snapshot,
                            self.config.sort,
                        ))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading case dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load case dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.config.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
