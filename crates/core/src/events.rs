use crate::{Card, PileRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Rejection {
    NotPlaying,
    NoDrag,
    StaleDrag,
    NotMovable,
    SamePile,
    IllegalTarget,
    NoFoundationAccepts,
}

impl Rejection {
    pub fn label(self) -> &'static str {
        match self {
            Rejection::NotPlaying => "no game in progress",
            Rejection::NoDrag => "nothing is being dragged",
            Rejection::StaleDrag => "the dragged cards moved before the drop",
            Rejection::NotMovable => "those cards cannot be picked up",
            Rejection::SamePile => "cards dropped back on their own pile",
            Rejection::IllegalTarget => "that pile does not accept those cards",
            Rejection::NoFoundationAccepts => "no foundation accepts that card",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    Dealt { seed: u64 },
    Drawn { card: Card },
    Recycled { count: usize },
    Moved {
        from: PileRef,
        to: PileRef,
        cards: Vec<Card>,
        score_delta: u32,
    },
    Flipped { pile: PileRef, card: Card },
    Rejected { reason: Rejection },
    Won { score: u32 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
