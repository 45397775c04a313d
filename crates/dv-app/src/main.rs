//! Main application entry point

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, Context};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dv_core::{DashboardSettings, DashboardState, NoticeLevel};
use dv_data::{CsvSource, DashboardConfig, DataSource, LoadedTable, TextSource};
use dv_ui::{MenuAction, ShellConfig, Theme};
use dv_views::plots::{BAR_DATASET, HEATMAP_DATASET};
use dv_views::{ViewerContext, Viewport};

mod demo;
mod loads;

use loads::{LoadMessage, LoadTracker};

const CONFIG_FILE: &str = "dashboard.json";

/// Main application state
struct DashboardApp {
    state: Arc<DashboardState>,
    viewer_context: ViewerContext,
    viewport: Viewport,
    theme: Theme,
    shell: ShellConfig,
    runtime: tokio::runtime::Runtime,
    loads: LoadTracker,
    loads_tx: UnboundedSender<LoadMessage>,
    loads_rx: UnboundedReceiver<LoadMessage>,
    egui_ctx: Context,
}

impl DashboardApp {
    fn new(cc: &eframe::CreationContext<'_>, runtime: tokio::runtime::Runtime, config: DashboardConfig) -> Self {
        let theme = Theme::default();
        dv_ui::apply_theme(&cc.egui_ctx, &theme);
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let state = Arc::new(DashboardState::new(DashboardSettings {
            line_candidates: config.line_chart.candidate_dimensions(),
        }));
        let viewer_context = ViewerContext::new(state.clone(), Arc::new(config));
        let mut viewport = Viewport::new();
        viewport.create_dashboard_layout(&viewer_context);

        let (loads_tx, loads_rx) = unbounded_channel();
        let mut app = Self {
            state,
            viewer_context,
            viewport,
            theme,
            shell: ShellConfig::default(),
            runtime,
            loads: LoadTracker::default(),
            loads_tx,
            loads_rx,
            egui_ctx: cc.egui_ctx.clone(),
        };

        let config = app.viewer_context.config.clone();
        match &config.preload {
            Some(path) => app.open_csv_file(path.clone()),
            None => app.load_sample(),
        }
        app.load_auxiliary(BAR_DATASET, &config.bar_chart.path);
        app.load_auxiliary(HEATMAP_DATASET, &config.heatmap.path);
        app
    }

    /// Open a CSV file. The current dataset stays until the new one is parsed.
    fn open_csv_file(&mut self, path: PathBuf) {
        info!("Opening CSV file: {:?}", path);
        let token = self.loads.begin();
        let tx = self.loads_tx.clone();
        let ctx = self.egui_ctx.clone();

        self.runtime.spawn(async move {
            let result = CsvSource::new(path.clone()).load().await;
            if tx.send(LoadMessage::Main { token, path, result }).is_err() {
                warn!("Dashboard closed before the load finished");
            }
            ctx.request_repaint();
        });
    }

    fn load_auxiliary(&mut self, name: &'static str, path: &Path) {
        let path = path.to_path_buf();
        let tx = self.loads_tx.clone();
        let ctx = self.egui_ctx.clone();

        self.runtime.spawn(async move {
            let result = CsvSource::new(path.clone()).load().await;
            let _ = tx.send(LoadMessage::Auxiliary { name, path, result });
            ctx.request_repaint();
        });
    }

    fn load_sample(&mut self) {
        self.loads.begin();
        match TextSource::new(demo::SAMPLE_NAME, demo::ARAL_SEA_CSV).load_blocking() {
            Ok(table) => self.apply_table(table),
            Err(e) => error!("Built-in sample failed to parse: {}", e),
        }
    }

    fn apply_table(&mut self, table: LoadedTable) {
        for warning in &table.warnings {
            warn!("{}: {}", table.source_name, warning);
            self.state.notify(NoticeLevel::Warning, format!("{}: {}", table.source_name, warning));
        }
        self.state.load_dataset(table.dataset, table.source_name);
    }

    /// Apply finished loads on the UI thread
    fn drain_loads(&mut self) {
        while let Ok(message) = self.loads_rx.try_recv() {
            match message {
                LoadMessage::Main { token, path, .. } if !self.loads.is_current(token) => {
                    debug!("Dropping superseded load of {:?}", path);
                }
                LoadMessage::Main { path, result, .. } => match result {
                    Ok(table) => self.apply_table(table),
                    Err(e) => {
                        error!("Failed to open CSV file {:?}: {}", path, e);
                        self.state
                            .notify(NoticeLevel::Warning, format!("Could not load {}: {}", path.display(), e));
                    }
                },
                LoadMessage::Auxiliary { name, path, result } => match result {
                    Ok(table) => {
                        info!("Loaded {} from {:?} ({} rows)", name, path, table.dataset.len());
                        self.state.set_auxiliary(name, table.dataset);
                    }
                    Err(e) => {
                        warn!("Auxiliary dataset {:?} unavailable: {}", path, e);
                        self.state
                            .notify(NoticeLevel::Info, format!("{} unavailable: {}", path.display(), e));
                    }
                },
            }
        }
    }

    fn handle_menu_action(&mut self, ctx: &Context, action: MenuAction) {
        match action {
            MenuAction::OpenCsv => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV Files", &["csv", "tsv", "txt"])
                    .pick_file()
                {
                    self.open_csv_file(path);
                }
            }
            MenuAction::LoadSample => self.load_sample(),
            MenuAction::ClearSelection => self.state.clear_selection(),
            MenuAction::ResetLayout => {
                self.viewport.create_dashboard_layout(&self.viewer_context);
            }
            MenuAction::ToggleTheme => {
                self.theme = if self.theme.dark_mode { Theme::light() } else { Theme::dark() };
                dv_ui::apply_theme(ctx, &self.theme);
            }
            MenuAction::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_loads();

        let dt = ctx.input(|i| i.unstable_dt);
        self.viewport.on_frame_update(&self.viewer_context, dt);

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.state.clear_selection();
        }

        if self.shell.show_menu_bar {
            if let Some(action) = dv_ui::menu_bar(ctx, &self.state) {
                self.handle_menu_action(ctx, action);
            }
        }
        if self.shell.show_channel_bar {
            dv_ui::channel_bar(ctx, &self.state);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport.ui(ui, &self.viewer_context);
        });

        dv_ui::show_notices(ctx, &self.state);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dashboard");

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));
    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Aral Sea Dashboard",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, runtime, config))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
