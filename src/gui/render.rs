//! GUI rendering functions.
//!
//! One function per screen. Each returns whether its primary button was used;
//! the app performs the transition.

use eframe::egui::{self, Color32, RichText, TextureHandle, Vec2};

use super::state::GuiState;
use crate::api::RankingBoard;
use crate::content::find_bundle;
use crate::puzzle::{PuzzleKind, ROUND_COUNT};
use crate::session::summary::{
    accuracy_level, cumulative_time_level, format_seconds, is_fast_and_accurate,
    round_time_level,
};
use crate::session::{
    FeedbackLevel, PlayerIdentity, RoundResult, SessionState, SessionSummary, SubmitStatus,
};

const GOOD_COLOR: Color32 = Color32::from_rgb(59, 130, 246);
const OK_COLOR: Color32 = Color32::from_rgb(34, 160, 94);
const BAD_COLOR: Color32 = Color32::from_rgb(220, 68, 68);
const ERROR_COLOR: Color32 = Color32::from_rgb(200, 40, 40);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 196, 0);

fn level_color(level: FeedbackLevel) -> Color32 {
    match level {
        FeedbackLevel::Good => GOOD_COLOR,
        FeedbackLevel::Ok => OK_COLOR,
        FeedbackLevel::Bad => BAD_COLOR,
    }
}

fn kind_label(kind: PuzzleKind) -> &'static str {
    match kind {
        PuzzleKind::Text => "문장",
        PuzzleKind::Arithmetic => "계산",
        PuzzleKind::DotCount => "개수",
    }
}

/// Button used on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    None,
    Start,
    ShowRanking,
}

/// Render the identity form.
pub fn render_start(ui: &mut egui::Ui, state: &mut GuiState, starting: bool) -> StartAction {
    let mut action = StartAction::None;

    ui.label("이미지 속 글자를 최대한 빠르고 정확하게 입력하세요. 총 5문제입니다.");
    ui.add_space(12.0);

    egui::Grid::new("identity_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("회사");
            ui.text_edit_singleline(&mut state.company);
            ui.end_row();

            ui.label("사번");
            ui.text_edit_singleline(&mut state.employee_id);
            ui.end_row();

            ui.label("이름");
            ui.text_edit_singleline(&mut state.name);
            ui.end_row();
        });

    ui.add_space(16.0);

    let label = if starting { "준비 중..." } else { "▶ 시작하기" };
    ui.horizontal(|ui| {
        ui.add_enabled_ui(!starting && state.content_error.is_none(), |ui| {
            if ui.button(RichText::new(label).size(18.0)).clicked() {
                action = StartAction::Start;
            }
        });
        if starting {
            ui.spinner();
        }
        ui.add_space(12.0);
        ui.add_enabled_ui(!starting, |ui| {
            if ui.button("🏆 전체 랭킹 보기").clicked() {
                action = StartAction::ShowRanking;
            }
        });
    });

    if let Some(err) = &state.content_error {
        ui.add_space(8.0);
        ui.colored_label(ERROR_COLOR, err);
    }
    if let Some(err) = &state.start_error {
        ui.add_space(8.0);
        ui.colored_label(ERROR_COLOR, err);
    }

    action
}

/// Draw the puzzle image or a grey placeholder.
fn render_puzzle_image(ui: &mut egui::Ui, texture: Option<&TextureHandle>, size: Vec2) {
    let max_width = ui.available_width().min(size.x);
    let scaled = size * (max_width / size.x.max(1.0));

    if let Some(texture) = texture {
        ui.image((texture.id(), scaled));
    } else {
        let (rect, _response) = ui.allocate_exact_size(scaled, egui::Sense::hover());
        ui.painter().rect_filled(rect, 4.0, Color32::from_gray(230));
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "이미지를 표시할 수 없습니다",
            egui::FontId::proportional(16.0),
            Color32::from_gray(100),
        );
    }
}

/// Render the active puzzle and answer box. Returns true on submit.
pub fn render_playing(
    ui: &mut egui::Ui,
    state: &mut GuiState,
    session: &SessionState,
    kind: PuzzleKind,
    texture: Option<&TextureHandle>,
    image_size: Vec2,
) -> bool {
    let mut submit_clicked = false;

    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("문제 {}/{}", session.round, ROUND_COUNT)).strong());
        if kind == PuzzleKind::Text && session.round == 3 {
            ui.label(format!("· {}", find_bundle(&session.current_bundle_id).label));
        }
    });
    ui.add_space(8.0);

    render_puzzle_image(ui, texture, image_size);
    ui.add_space(12.0);

    let hint = match kind {
        PuzzleKind::Text => "이미지 속 문장을 그대로 입력하세요 (띄어쓰기는 채점하지 않습니다)",
        PuzzleKind::Arithmetic => "계산 결과를 숫자로 입력하세요",
        PuzzleKind::DotCount => "글자 개수를 숫자로 입력하세요",
    };

    let response = if kind.is_numeric() {
        ui.add(egui::TextEdit::singleline(&mut state.answer).hint_text(hint))
    } else {
        ui.add(
            egui::TextEdit::multiline(&mut state.answer)
                .hint_text(hint)
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        )
    };

    let enter_pressed = if kind.is_numeric() {
        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
    } else {
        response.has_focus() && ui.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::Enter))
    };

    ui.horizontal(|ui| {
        ui.label(format!("{}자 입력", state.answer.chars().count()));
        ui.add_space(16.0);
        if ui.button(RichText::new("제출").size(16.0)).clicked() {
            submit_clicked = true;
        }
    });

    submit_clicked || enter_pressed
}

/// Render the score of the last round. Returns true on next.
pub fn render_result(ui: &mut egui::Ui, result: &RoundResult, session: &SessionState) -> bool {
    let mut next_clicked = false;

    ui.heading(format!("문제 {} 결과", result.round));
    ui.add_space(12.0);

    egui::Grid::new("round_result")
        .num_columns(2)
        .spacing([16.0, 8.0])
        .show(ui, |ui| {
            ui.label("이번 문제 시간");
            ui.colored_label(
                level_color(round_time_level(result.elapsed_ms)),
                format!("{}초", format_seconds(result.elapsed_ms)),
            );
            ui.end_row();

            ui.label("누적 시간");
            ui.colored_label(
                level_color(cumulative_time_level(session.cumulative_elapsed_ms, session.round)),
                format!("{}초", format_seconds(session.cumulative_elapsed_ms)),
            );
            ui.end_row();

            ui.label("정확도");
            ui.colored_label(
                level_color(accuracy_level(result.accuracy)),
                format!("{}%", result.accuracy),
            );
            ui.end_row();
        });

    if is_fast_and_accurate(result.elapsed_ms, result.accuracy) {
        ui.add_space(8.0);
        ui.label(RichText::new("★ 빠르고 정확합니다!").color(HIGHLIGHT_COLOR).strong());
    }

    ui.add_space(16.0);
    let label = if result.round >= ROUND_COUNT {
        "결과 보기"
    } else {
        "다음 문제"
    };
    if ui.button(RichText::new(label).size(16.0)).clicked() {
        next_clicked = true;
    }

    next_clicked
}

/// Render the session summary and ranking board. Returns true on restart.
pub fn render_ranking(
    ui: &mut egui::Ui,
    summary: &SessionSummary,
    identity: &PlayerIdentity,
    ranking: Option<&RankingBoard>,
    submit_status: SubmitStatus,
) -> bool {
    let mut restart_clicked = false;

    ui.heading("세션 결과");
    ui.add_space(8.0);
    ui.label(format!(
        "총 시간 {}초 · 평균 정확도 {:.2}%",
        format_seconds(summary.total_ms),
        summary.avg_accuracy
    ));
    let status = submit_status.status_text();
    if !status.is_empty() {
        ui.label(RichText::new(status).small());
    }

    ui.add_space(8.0);
    egui::Grid::new("session_rounds")
        .num_columns(3)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            for result in &summary.results {
                ui.label(format!("{}. {}", result.round, kind_label(result.kind)));
                ui.label(format!("{}초", format_seconds(result.elapsed_ms)));
                ui.colored_label(
                    level_color(accuracy_level(result.accuracy)),
                    format!("{}%", result.accuracy),
                );
                ui.end_row();
            }
        });

    ui.add_space(12.0);
    ui.separator();
    ui.heading("랭킹");
    ui.add_space(8.0);

    render_board(ui, ranking, identity);

    ui.add_space(16.0);
    if ui.button(RichText::new("다시하기").size(16.0)).clicked() {
        restart_clicked = true;
    }

    restart_clicked
}

/// Ranking window opened from the start screen. Returns true on close.
pub fn render_ranking_panel(
    ctx: &egui::Context,
    ranking: Option<&RankingBoard>,
    identity: &PlayerIdentity,
) -> bool {
    let mut close_clicked = false;

    egui::Window::new("🏆 전체 랭킹")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            render_board(ui, ranking, identity);
            ui.add_space(12.0);
            if ui.button("닫기").clicked() {
                close_clicked = true;
            }
        });

    close_clicked
}

/// Board, or a spinner while it loads.
fn render_board(ui: &mut egui::Ui, ranking: Option<&RankingBoard>, identity: &PlayerIdentity) {
    match ranking {
        None => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("랭킹을 불러오는 중...");
            });
        }
        Some(board) => render_ranking_table(ui, board, identity),
    }
}

fn render_ranking_table(ui: &mut egui::Ui, board: &RankingBoard, identity: &PlayerIdentity) {
    if let Some(err) = &board.error {
        ui.colored_label(ERROR_COLOR, err);
        return;
    }
    if board.entries.is_empty() {
        ui.label("아직 등록된 기록이 없습니다.");
        return;
    }

    egui::ScrollArea::vertical()
        .max_height(320.0)
        .show(ui, |ui| {
            egui::Grid::new("ranking_table")
                .num_columns(4)
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for entry in &board.entries {
                        let mut rank = RichText::new(entry.rank.to_string()).strong();
                        if (1..=3).contains(&entry.rank) {
                            rank = rank.color(HIGHLIGHT_COLOR);
                        }
                        ui.label(rank);

                        let who = format!("[{}] {} ({})", entry.company, entry.name, entry.employee_id);
                        if entry.is_player(identity) {
                            ui.label(RichText::new(who).strong().color(GOOD_COLOR));
                        } else {
                            ui.label(who);
                        }

                        ui.label(format!("정확도 {:.1}%", entry.accuracy));
                        ui.label(format!("{:.2}초", entry.time));
                        ui.end_row();
                    }
                });
        });
}
