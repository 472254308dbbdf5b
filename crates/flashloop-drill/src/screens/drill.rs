use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use flashloop_engine::canvas::Canvas;
use flashloop_engine::coords::Vec2;
use flashloop_engine::input::{
    EventTarget, Key, KeyEvent, KeyEventKind, PointerEvent, PointerEventKind,
};
use flashloop_engine::looping::{Flow, LoopConfig, LoopController, LoopHandle};
use flashloop_engine::paint::Color;

use crate::problems::Problem;
use crate::score::{self, DrillReport, format_time};
use crate::stage::StageHandle;

use super::pause::pause_screen;

/// Longest answer accepted, in digits.
pub const MAX_ANSWER_LEN: usize = 5;

const HEADER_SIZE: f32 = 20.0;
const PROBLEM_SIZE: f32 = 40.0;
const BLANK: &str = "_____";

/// Where the finished drill leaves its report.
pub type ReportSlot = Rc<RefCell<Option<DrillReport>>>;

/// Answers, progress and timing of a running drill.
#[derive(Debug, Clone)]
pub struct DrillState {
    problems: Vec<Problem>,
    answers: Vec<u32>,
    answer: String,
    elapsed: Duration,
    pauses: u32,
    running: bool,
    paused: bool,
}

impl DrillState {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self {
            problems,
            answers: Vec::new(),
            answer: String::new(),
            elapsed: Duration::ZERO,
            pauses: 0,
            running: false,
            paused: false,
        }
    }

    pub fn current(&self) -> Option<Problem> {
        self.problems.get(self.answers.len()).copied()
    }

    /// The answer typed so far for the current problem.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn is_done(&self) -> bool {
        self.answers.len() >= self.problems.len()
    }

    pub fn pauses(&self) -> u32 {
        self.pauses
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Appends a digit; ignored once the answer is [`MAX_ANSWER_LEN`] long.
    pub fn push_digit(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.answer.len() >= MAX_ANSWER_LEN {
            return false;
        }
        self.answer.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.answer.pop().is_some()
    }

    /// Records the typed answer and moves to the next problem.
    ///
    /// Empty answers are ignored.
    pub fn submit(&mut self) -> bool {
        if self.answer.is_empty() || self.is_done() {
            return false;
        }
        // At most MAX_ANSWER_LEN ASCII digits, always fits.
        let value = self.answer.parse().unwrap_or(0);
        self.answers.push(value);
        self.answer.clear();
        true
    }

    pub fn report(&self) -> DrillReport {
        score::grade(&self.problems, &self.answers, self.elapsed, self.pauses)
    }

    /// Applies one key event.
    ///
    /// Backspace acts on key-down and works while paused. Space toggles
    /// pause; digits and Enter are ignored while paused.
    pub fn handle_key(&mut self, ev: &KeyEvent, handle: &LoopHandle) {
        if !self.running {
            return;
        }

        match ev.kind {
            KeyEventKind::Down if ev.key == Key::Backspace => {
                self.backspace();
            }
            KeyEventKind::Press => match ev.key {
                Key::Space => self.toggle_pause(handle),
                _ if self.paused => {}
                Key::Enter => {
                    if !self.submit() {
                        log::debug!("no answer yet, ignoring enter");
                    }
                }
                _ => {
                    if let Some(c) = ev.text {
                        if !self.push_digit(c) && c.is_ascii_digit() {
                            log::debug!("answer too long, ignoring {c:?}");
                        }
                    }
                }
            },
            _ => {}
        }
    }

    /// A button press anywhere toggles pause, like Space.
    pub fn handle_pointer(&mut self, ev: &PointerEvent, handle: &LoopHandle) {
        if self.running && ev.kind == PointerEventKind::Down {
            self.toggle_pause(handle);
        }
    }

    fn toggle_pause(&self, handle: &LoopHandle) {
        if self.paused {
            handle.start();
        } else {
            handle.pause();
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.clear(Color::WHITE);
        let total = self.problems.len();
        draw_progress(canvas, (self.answered() + 1).min(total), total, self.elapsed);
        if let Some(problem) = self.current() {
            draw_problem(canvas, problem, &self.answer);
        }
    }
}

/// `i / n` on the left, elapsed time on the right.
fn draw_progress(canvas: &mut Canvas, i: usize, n: usize, elapsed: Duration) {
    canvas.draw_text(&format!("{i} / {n}"), Vec2::zero(), HEADER_SIZE, Color::BLACK);

    let clock = format_time(elapsed.as_secs());
    let width = canvas.measure_text(&clock, HEADER_SIZE).x;
    let x = canvas.width() as f32 - width;
    canvas.draw_text(&clock, Vec2::new(x, 0.0), HEADER_SIZE, Color::BLACK);
}

/// `a × b =  _____` centered, with the answer centered over the blank.
fn draw_problem(canvas: &mut Canvas, problem: Problem, answer: &str) {
    let question = format!("{problem} =  ");
    let qw = canvas.measure_text(&question, PROBLEM_SIZE).x;
    let bw = canvas.measure_text(BLANK, PROBLEM_SIZE).x;
    let aw = canvas.measure_text(answer, PROBLEM_SIZE).x;

    let y = (canvas.height() as f32 - PROBLEM_SIZE) / 2.0;
    let qx = (canvas.width() as f32 - qw - bw) / 2.0;
    let bx = qx + qw;

    canvas.draw_text(&question, Vec2::new(qx, y), PROBLEM_SIZE, Color::BLACK);
    canvas.draw_text(BLANK, Vec2::new(bx, y), PROBLEM_SIZE, Color::BLACK);
    canvas.draw_text(answer, Vec2::new(bx + (bw - aw) / 2.0, y), PROBLEM_SIZE, Color::BLACK);
}

/// The drill loop.
///
/// Stops itself once every problem has an answer and leaves the graded
/// report in `report`. Each pause spawns a pause overlay on `stage`.
pub fn drill_screen(
    target: Rc<dyn EventTarget>,
    problems: Vec<Problem>,
    stage: StageHandle,
    report: ReportSlot,
) -> LoopController<Canvas> {
    let state = Rc::new(RefCell::new(DrillState::new(problems)));

    let ticker = state.clone();
    let painter = state.clone();
    let starter = state.clone();
    let pauser = state.clone();
    let stopper = state.clone();
    let keys = state.clone();
    let clicks = state;
    let overlay_target = target.clone();

    let config = LoopConfig::new()
        .on_tick(move |t, _| {
            let mut s = ticker.borrow_mut();
            s.elapsed = t;
            if s.is_done() { Flow::Stop } else { Flow::Continue }
        })
        .on_render(move |canvas: &mut Canvas| {
            painter.borrow().draw(canvas);
            Flow::Continue
        })
        .on_start(move || {
            let mut s = starter.borrow_mut();
            s.running = true;
            s.paused = false;
            log::debug!("drill started");
        })
        .on_pause(move || {
            let mut s = pauser.borrow_mut();
            s.paused = true;
            s.pauses += 1;
            log::debug!("drill paused ({} so far)", s.pauses);
            if !stage.spawn(pause_screen(overlay_target.clone())) {
                log::warn!("stage is gone, pause overlay not shown");
            }
        })
        .on_stop(move || {
            let mut s = stopper.borrow_mut();
            s.running = false;
            s.paused = false;
            let graded = s.report();
            log::info!(
                "drill finished: {} / {} in {}",
                graded.correct.len(),
                graded.total(),
                graded.elapsed
            );
            *report.borrow_mut() = Some(graded);
        })
        .on_key(move |ev: &KeyEvent, handle: &LoopHandle| {
            keys.borrow_mut().handle_key(ev, handle);
        })
        .on_mouse(move |ev: &PointerEvent, handle: &LoopHandle| {
            clicks.borrow_mut().handle_pointer(ev, handle);
        });

    LoopController::new(target, config)
}
