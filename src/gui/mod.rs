//! GUI module for the application.
//!
//! Provides the quiz window using egui/eframe. The session driver runs on the
//! UI thread; proxy requests run on worker threads and are polled every frame.

pub mod render;
pub mod state;

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, TextureHandle, Vec2};

use crate::api::{HttpScoreService, RankingBoard, SharedService, SubmitPayload};
use crate::config::get_config;
use crate::content::ContentLibrary;
use crate::render::PuzzleRenderer;
use crate::session::store::load_identity;
use crate::session::{GamePhase, JsonFileStore, QuizMachine, SessionDriver};

use render::StartAction;
use state::GuiState;

/// Fonts with Hangul coverage, tried in order.
const KOREAN_FONT_PATHS: [&str; 6] = [
    "C:\\Windows\\Fonts\\malgun.ttf",
    "C:\\Windows\\Fonts\\gulim.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
];

/// Main GUI application struct.
pub struct GuiApp {
    state: GuiState,
    driver: SessionDriver<JsonFileStore>,
    /// Texture of the current puzzle, keyed by round.
    puzzle_texture: Option<(u8, TextureHandle)>,
}

impl GuiApp {
    /// Create a new GUI application instance.
    pub fn new(cc: &eframe::CreationContext<'_>, service: SharedService) -> Self {
        Self::setup_fonts(&cc.egui_ctx);

        let config = get_config();
        let store = JsonFileStore::open(&config.state_file());
        let library = ContentLibrary::new(config.content_dir());
        crate::log(&format!("Content directory: {}", library.dir().display()));

        let mut state = GuiState::with_identity(&load_identity(&store));
        let baseline = match library.load_baseline() {
            Ok(pools) => Some(pools),
            Err(e) => {
                state.content_error = Some(e.to_string());
                None
            }
        };

        let renderer = PuzzleRenderer::new(config.font_family.clone(), config.count_style);
        crate::log(&format!("Counting round style: {:?}", renderer.count_style()));
        let machine = QuizMachine::from_entropy(Box::new(renderer));

        Self {
            state,
            driver: SessionDriver::new(machine, service, store, library, baseline),
            puzzle_texture: None,
        }
    }

    /// Setup fonts with Korean support.
    fn setup_fonts(ctx: &egui::Context) {
        let mut fonts = egui::FontDefinitions::default();

        let mut font_loaded = false;
        for font_path in &KOREAN_FONT_PATHS {
            if let Ok(font_data) = std::fs::read(font_path) {
                fonts.font_data.insert(
                    "korean_font".to_owned(),
                    egui::FontData::from_owned(font_data).into(),
                );
                for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                    fonts
                        .families
                        .entry(family)
                        .or_default()
                        .insert(0, "korean_font".to_owned());
                }

                crate::log(&format!("Loaded Korean font from: {}", font_path));
                font_loaded = true;
                break;
            }
        }

        if !font_loaded {
            crate::log("Warning: Could not load a Korean font. Text may not display correctly.");
        }

        ctx.set_fonts(fonts);
    }

    /// Upload the current puzzle image when the round changes.
    fn sync_puzzle_texture(&mut self, ctx: &egui::Context) {
        let Some(puzzle) = self.driver.machine().puzzle() else {
            self.puzzle_texture = None;
            return;
        };
        if matches!(&self.puzzle_texture, Some((round, _)) if *round == puzzle.round) {
            return;
        }

        self.puzzle_texture = match puzzle.image.decode() {
            Ok(rgba) => {
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
                let texture = ctx.load_texture(
                    format!("puzzle_round_{}", puzzle.round),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                Some((puzzle.round, texture))
            }
            Err(e) => {
                crate::log(&format!("GUI: Failed to load puzzle texture: {}", e));
                None
            }
        };
    }

    /// Handle start button click.
    fn handle_start(&mut self) {
        match self.driver.request_start(self.state.identity()) {
            Ok(()) => self.state.start_error = None,
            Err(e) => self.state.start_error = Some(e.to_string()),
        }
    }

    fn handle_show_ranking(&mut self) {
        if let Err(e) = self.driver.open_ranking_panel() {
            crate::log(&format!("GUI: Ranking panel not opened: {}", e));
        }
    }

    fn handle_submit(&mut self) {
        match self.driver.submit(&self.state.answer, Instant::now()) {
            Ok(_) => self.state.answer.clear(),
            Err(e) => crate::log(&format!("GUI: Submit ignored: {}", e)),
        }
    }

    fn handle_next(&mut self) {
        if let Err(e) = self.driver.advance(Instant::now()) {
            crate::log(&format!("GUI: Advance ignored: {}", e));
        }
    }

    fn handle_restart(&mut self) {
        self.driver.restart();
        self.state.reset_session();
        self.puzzle_texture = None;
        crate::log("GUI: Restarted");
    }

    /// Apply finished worker requests.
    fn poll_requests(&mut self) {
        if let Err(e) = self.driver.poll(Instant::now()) {
            self.state.start_error = Some(e.to_string());
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_requests();
        self.sync_puzzle_texture(ctx);

        // Keep polling while workers are busy
        if self.driver.has_pending_requests() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if self.driver.ranking_panel_open() {
            let identity = self.state.identity();
            if render::render_ranking_panel(ctx, self.driver.ranking(), &identity) {
                self.driver.close_ranking_panel();
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Human OCR");
            ui.add_space(12.0);

            egui::ScrollArea::vertical().show(ui, |ui| match self.driver.machine().phase() {
                GamePhase::Start => {
                    let starting = self.driver.is_starting();
                    match render::render_start(ui, &mut self.state, starting) {
                        StartAction::Start => self.handle_start(),
                        StartAction::ShowRanking => self.handle_show_ranking(),
                        StartAction::None => {}
                    }
                }
                GamePhase::Playing => {
                    let machine = self.driver.machine();
                    let Some(puzzle) = machine.puzzle() else {
                        return;
                    };
                    let kind = puzzle.kind;
                    let size = Vec2::new(puzzle.image.width as f32, puzzle.image.height as f32);
                    let texture = self.puzzle_texture.as_ref().map(|(_, t)| t);
                    if render::render_playing(
                        ui,
                        &mut self.state,
                        machine.session(),
                        kind,
                        texture,
                        size,
                    ) {
                        self.handle_submit();
                    }
                }
                GamePhase::Result => {
                    let machine = self.driver.machine();
                    let Some(result) = machine.last_result() else {
                        return;
                    };
                    if render::render_result(ui, result, machine.session()) {
                        self.handle_next();
                    }
                }
                GamePhase::RankingReview => {
                    let machine = self.driver.machine();
                    let Some(summary) = machine.summary() else {
                        return;
                    };
                    if render::render_ranking(
                        ui,
                        summary,
                        machine.identity(),
                        self.driver.ranking(),
                        self.driver.submit_status(),
                    ) {
                        self.handle_restart();
                    }
                }
            });
        });
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui() -> eframe::Result<()> {
    let config = get_config();
    let service: SharedService =
        match HttpScoreService::new(&config.api_base_url, config.request_timeout_secs) {
            Ok(service) => Arc::new(service) as SharedService,
            Err(e) => {
                crate::log(&format!("GUI: HTTP client unavailable: {}", e));
                Arc::new(OfflineService) as SharedService
            }
        };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(880.0, 760.0))
            .with_min_inner_size(Vec2::new(600.0, 500.0))
            .with_title("Human OCR"),
        ..Default::default()
    };

    crate::log("GUI: Calling eframe::run_native...");

    eframe::run_native(
        "Human OCR",
        options,
        Box::new(move |cc| Ok(Box::new(GuiApp::new(cc, service)))),
    )
}

/// Used when no HTTP client can be built: every call takes its default.
struct OfflineService;

impl crate::api::ScoreService for OfflineService {
    fn play_count(&self, _: &str, _: &str) -> u32 {
        0
    }

    fn ranking(&self) -> RankingBoard {
        RankingBoard::failed(crate::api::client::RANKING_NETWORK_ERROR)
    }

    fn submit(&self, _: &SubmitPayload) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("HTTP client unavailable"))
    }
}
