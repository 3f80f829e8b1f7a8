//! Bouncing-card win screen. Purely cosmetic: when it finishes the app
//! simply starts a new game.

use klondike_core::{build_deck, Card, RngState};
use std::time::Duration;

pub const CELEBRATION_LENGTH: Duration = Duration::from_secs(12);
pub const CARD_WIDTH: f32 = 5.0;
pub const CARD_HEIGHT: f32 = 3.0;

const GRAVITY: f32 = 0.05;
const WALL_BOUNCE: f32 = 0.9;
const FLOOR_BOUNCE: f32 = 0.85;
const FLOOR_FRICTION: f32 = 0.98;
const STEPS_PER_TICK: usize = 2;

#[derive(Debug, Clone)]
pub struct BouncingCard {
    pub card: Card,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone)]
pub struct Celebration {
    pub cards: Vec<BouncingCard>,
    width: f32,
    height: f32,
    elapsed: Duration,
}

impl Celebration {
    /// Drops a face-up copy of every card in from above the arena.
    pub fn new(width: u16, height: u16, rng: &mut RngState) -> Self {
        let width = f32::from(width.max(1));
        let height = f32::from(height.max(1));
        let cards = build_deck()
            .into_iter()
            .map(|mut card| {
                card.face_up = true;
                BouncingCard {
                    card,
                    x: rng.range_f32(0.0, (width - CARD_WIDTH).max(1.0)),
                    y: -CARD_HEIGHT - rng.range_f32(0.0, height * 2.0),
                    vx: rng.range_f32(-1.0, 1.0),
                    vy: rng.range_f32(0.5, 1.5),
                }
            })
            .collect();
        Self {
            cards,
            width,
            height,
            elapsed: Duration::ZERO,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = f32::from(width.max(1));
        self.height = f32::from(height.max(1));
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
        for _ in 0..STEPS_PER_TICK {
            self.step();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= CELEBRATION_LENGTH
    }

    fn step(&mut self) {
        let max_x = (self.width - CARD_WIDTH).max(0.0);
        let floor = (self.height - CARD_HEIGHT).max(0.0);
        for card in &mut self.cards {
            card.vy += GRAVITY;
            card.x += card.vx;
            card.y += card.vy;

            if card.x <= 0.0 || card.x >= max_x {
                card.vx *= -WALL_BOUNCE;
                card.x = card.x.clamp(0.0, max_x);
            }
            if card.y >= floor {
                card.vy *= -FLOOR_BOUNCE;
                card.y = floor;
                card.vx *= FLOOR_FRICTION;
            }
            // Cards start above the arena; only bounce off the top on the way up.
            if card.y <= 0.0 && card.vy < 0.0 {
                card.vy *= -FLOOR_BOUNCE;
                card.y = 0.0;
            }
        }
    }
}
