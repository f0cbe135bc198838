//! Software-rendered preview window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │   tracked hands: major in cyan, minor in orange             │
//! │                                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MAJOR: FIST   MINOR: PALM   [DRAG] [ARMED] [PINCH]         │
//! │  last action / status                                       │
//! │  key legend                                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! In simulation mode the window's keyboard also drives the synthetic
//! hands through [`SimInput`].

use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use gesture_control::{Action, ArmingFlags};
use hand_gesture::{landmark::index, Gesture, HandPose, HandRole, LandmarkSet};

use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 960;
pub const WIN_H:     usize = 600;
const VIEW_H:        usize = WIN_H - PANEL_H;
const PANEL_H:       usize = 80;
const BG_COLOR:      u32   = 0xFF1A1A2E;
const PANEL_BG:      u32   = 0xFF0F3460;
const MAJOR_COLOR:   u32   = 0xFF4FD1E8;
const MINOR_COLOR:   u32   = 0xFFFFA552;
const JOINT_COLOR:   u32   = 0xFFEEEEEE;
const FLAG_COLOR:    u32   = 0xFFFFD700;
const DIM_TEXT:      u32   = 0xFF888888;
const SIM_STEP:      f32   = 0.01;

/// Landmark pairs joined when drawing a skeleton.
const BONES: [(usize, usize); 21] = [
    (index::WRIST, index::THUMB_CMC),
    (index::THUMB_CMC, index::THUMB_MCP),
    (index::THUMB_MCP, index::THUMB_IP),
    (index::THUMB_IP, index::THUMB_TIP),
    (index::WRIST, index::INDEX_MCP),
    (index::INDEX_MCP, index::INDEX_PIP),
    (index::INDEX_PIP, index::INDEX_DIP),
    (index::INDEX_DIP, index::INDEX_TIP),
    (index::MIDDLE_MCP, index::MIDDLE_PIP),
    (index::MIDDLE_PIP, index::MIDDLE_DIP),
    (index::MIDDLE_DIP, index::MIDDLE_TIP),
    (index::RING_MCP, index::RING_PIP),
    (index::RING_PIP, index::RING_DIP),
    (index::RING_DIP, index::RING_TIP),
    (index::PINKY_MCP, index::PINKY_PIP),
    (index::PINKY_PIP, index::PINKY_DIP),
    (index::PINKY_DIP, index::PINKY_TIP),
    (index::INDEX_MCP, index::MIDDLE_MCP),
    (index::MIDDLE_MCP, index::RING_MCP),
    (index::RING_MCP, index::PINKY_MCP),
    (index::WRIST, index::PINKY_MCP),
];

/// Pose keys in the simulator, `1`..`8`.
const POSE_KEYS: [(Key, HandPose); 8] = [
    (Key::Key1, HandPose::Open),
    (Key::Key2, HandPose::Fist),
    (Key::Key3, HandPose::VGest),
    (Key::Key4, HandPose::Mid),
    (Key::Key5, HandPose::Index),
    (Key::Key6, HandPose::TwoFingerClosed),
    (Key::Key7, HandPose::Pinch),
    (Key::Key8, HandPose::ThreeFingerScroll),
];

/// One hand as drawn this frame.
#[derive(Clone, Debug)]
pub struct PreviewHand {
    pub role:      HandRole,
    pub landmarks: LandmarkSet,
}

/// Everything the window shows for one frame.
#[derive(Clone, Debug, Default)]
pub struct Preview {
    pub hands:       Vec<PreviewHand>,
    pub major:       Gesture,
    pub minor:       Gesture,
    pub flags:       ArmingFlags,
    pub last_action: Option<Action>,
    pub status:      String,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    /// Present only in simulation mode.
    sim_tx: Option<Sender<SimInput>>,
}

impl Visualizer {
    pub fn new(sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let mut window = Window::new(
            "leap_pointer",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("failed to open preview window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16)));

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll the keyboard.  Returns false when the window should close.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return false;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        let mut inputs = Vec::new();
        if one_shot(Key::Q) {
            inputs.push(SimInput::Quit);
        }
        for (key, pose) in POSE_KEYS {
            if one_shot(key) {
                inputs.push(SimInput::Pose(pose));
            }
        }
        if one_shot(Key::Tab)   { inputs.push(SimInput::SwitchHand); }
        if one_shot(Key::H)     { inputs.push(SimInput::ToggleSecondHand); }
        if one_shot(Key::Space) { inputs.push(SimInput::ToggleActiveHand); }

        let mut dx = 0.0;
        let mut dy = 0.0;
        if held(Key::Left)  { dx -= SIM_STEP; }
        if held(Key::Right) { dx += SIM_STEP; }
        if held(Key::Up)    { dy -= SIM_STEP; }
        if held(Key::Down)  { dy += SIM_STEP; }
        if dx != 0.0 || dy != 0.0 {
            inputs.push(SimInput::Move { dx, dy });
        }

        let quit = inputs.contains(&SimInput::Quit);
        if let Some(tx) = &self.sim_tx {
            for input in inputs {
                if tx.send(input).is_err() {
                    return false;
                }
            }
        }
        !quit
    }

    /// Render one frame.
    pub fn render(&mut self, preview: &Preview) {
        self.buf.fill(BG_COLOR);

        for hand in &preview.hands {
            let color = match hand.role {
                HandRole::Major => MAJOR_COLOR,
                HandRole::Minor => MINOR_COLOR,
            };
            self.draw_hand(&hand.landmarks, color);
        }

        // ── Status panel ──────────────────────────────────────────────────
        self.fill_rect(0, VIEW_H, WIN_W, PANEL_H, PANEL_BG);
        let roles = format!("major: {}   minor: {}", preview.major, preview.minor);
        self.draw_label(&roles, 10, VIEW_H + 10, MAJOR_COLOR);

        let mut fx = 10 + 4 * roles.len() + 20;
        for (on, label) in [
            (preview.flags.drag,        "[drag]"),
            (preview.flags.click_armed, "[armed]"),
            (preview.flags.pinch_major, "[pinch major]"),
            (preview.flags.pinch_minor, "[pinch minor]"),
        ] {
            if on {
                self.draw_label(label, fx, VIEW_H + 10, FLAG_COLOR);
                fx += 4 * label.len() + 8;
            }
        }

        let last = match preview.last_action {
            Some(action) => format!("last: {}", action),
            None         => "last: -".to_string(),
        };
        self.draw_label(&last, 10, VIEW_H + 28, JOINT_COLOR);
        self.draw_label(&preview.status, 10, VIEW_H + 44, JOINT_COLOR);

        if self.sim_tx.is_some() {
            self.draw_label(
                "1-8=pose  arrows=move  tab=switch hand  h=second hand  space=hide  q=quit",
                10, WIN_H - 14, DIM_TEXT,
            );
        }

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Hands ─────────────────────────────────────────────────────────────

    fn draw_hand(&mut self, hand: &LandmarkSet, color: u32) {
        for (a, b) in BONES {
            let (x0, y0) = to_view(hand.get(a).x, hand.get(a).y);
            let (x1, y1) = to_view(hand.get(b).x, hand.get(b).y);
            self.draw_line(x0, y0, x1, y1, color);
        }
        for p in hand.points() {
            let (x, y) = to_view(p.x, p.y);
            self.fill_rect((x - 2).max(0) as usize, (y - 2).max(0) as usize, 5, 5, JOINT_COLOR);
        }

        // Ring around a closed pinch.
        if hand.distance(index::THUMB_TIP, index::INDEX_TIP) < hand_gesture::classifier::PINCH_DISTANCE {
            let (x, y) = to_view(hand.get(index::INDEX_TIP).x, hand.get(index::INDEX_TIP).y);
            self.draw_diamond(x, y, 9, blend(color, 0xFFFFFFFF, 0.5));
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < WIN_W && (y as usize) < WIN_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    /// Bresenham.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    fn draw_diamond(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in 0..=r {
            let dx = r - dy;
            for (sx, sy) in [(cx + dx, cy + dy), (cx - dx, cy + dy), (cx + dx, cy - dy), (cx - dx, cy - dy)] {
                self.set_pixel(sx, sy, color);
            }
        }
    }

    /// Minimal bitmap font: 3×5 characters, one row of 3 bits each.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as isize, (y + row) as isize, color);
                    }
                }
            }
            cx += 4;
            if cx + 4 > WIN_W { break; }
        }
    }
}

/// Normalized image coordinates to pixels in the hand view.
fn to_view(x: f32, y: f32) -> (isize, isize) {
    (
        (x.clamp(0.0, 1.0) * (WIN_W - 1) as f32) as isize,
        (y.clamp(0.0, 1.0) * (VIEW_H - 1) as f32) as isize,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' | '[' => [0b011, 0b100, 0b100, 0b100, 0b011],
        ')' | ']' => [0b110, 0b001, 0b001, 0b001, 0b110],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 gives `a`, `t` = 1.0 gives `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}
