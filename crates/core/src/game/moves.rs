use super::*;
use crate::rules::{auto_play_target, is_legal_move, movable_unit, FOUNDATION_SCORE};
use crate::{Event, EventBus, PileKind};

impl Game {
    /// Moves the unit starting at `source` onto `target` if the rules allow
    /// it. Illegal moves come back as `Rejected` with the board untouched;
    /// only out-of-range positions are errors.
    pub fn apply_move(
        &mut self,
        source: MoveSource,
        target: PileRef,
        events: &mut EventBus,
    ) -> Result<MoveOutcome, EngineError> {
        let source_pile = self
            .board
            .pile(source.pile)
            .ok_or(EngineError::PileOutOfRange(source.pile))?;
        if source.card_index >= source_pile.len() {
            return Err(EngineError::CardOutOfRange {
                pile: source.pile,
                index: source.card_index,
            });
        }
        let target_pile = self
            .board
            .pile(target)
            .ok_or(EngineError::PileOutOfRange(target))?;

        if self.phase != Phase::Playing {
            return Ok(self.reject(Rejection::NotPlaying, events));
        }
        if source.pile == target {
            return Ok(self.reject(Rejection::SamePile, events));
        }
        let Some(unit) = movable_unit(source.pile.kind, source_pile, source.card_index) else {
            return Ok(self.reject(Rejection::NotMovable, events));
        };
        if !is_legal_move(unit, target.kind, target_pile) {
            return Ok(self.reject(Rejection::IllegalTarget, events));
        }

        Ok(MoveOutcome::Applied(self.transfer(source, target, events)))
    }

    /// Plays a single tail card from the waste or a tableau pile to the
    /// first foundation, slot 0 upward, that accepts it.
    pub fn double_click(
        &mut self,
        card: Card,
        source: PileRef,
        card_index: usize,
        events: &mut EventBus,
    ) -> Result<MoveOutcome, EngineError> {
        let found = self.card_at(source, card_index, &card)?;
        if self.phase != Phase::Playing {
            return Ok(self.reject(Rejection::NotPlaying, events));
        }
        let is_tail = self
            .board
            .pile(source)
            .is_some_and(|pile| pile.len() == card_index + 1);
        let eligible_pile = matches!(source.kind, PileKind::Waste | PileKind::Tableau);
        if !eligible_pile || !is_tail || !found.face_up {
            return Ok(self.reject(Rejection::NotMovable, events));
        }
        let Some(slot) = auto_play_target(&found, &self.board.foundations) else {
            return Ok(self.reject(Rejection::NoFoundationAccepts, events));
        };
        self.apply_move(
            MoveSource::new(source, card_index),
            PileRef::foundation(slot),
            events,
        )
    }

    /// Mutation half of a move; callers have already validated it.
    fn transfer(&mut self, source: MoveSource, target: PileRef, events: &mut EventBus) -> MoveReport {
        let mut flipped = None;
        let moved = match self.board.pile_mut(source.pile) {
            Some(pile) => {
                let moved = pile.split_off(source.card_index);
                if source.pile.kind == PileKind::Tableau {
                    if let Some(tail) = pile.last_mut().filter(|card| !card.face_up) {
                        tail.face_up = true;
                        flipped = Some(*tail);
                    }
                }
                moved
            }
            None => Vec::new(),
        };
        let count = moved.len();
        if let Some(pile) = self.board.pile_mut(target) {
            pile.extend(moved.iter().copied());
        }

        let score_delta = if target.kind == PileKind::Foundation {
            FOUNDATION_SCORE
        } else {
            0
        };
        self.score = self.score.saturating_add(score_delta);
        self.drag = None;

        tracing::debug!(from = %source.pile, to = %target, cards = count, score_delta, "moved cards");
        events.push(Event::Moved {
            from: source.pile,
            to: target,
            cards: moved,
            score_delta,
        });
        if let Some(card) = flipped {
            events.push(Event::Flipped {
                pile: source.pile,
                card,
            });
        }

        let won = target.kind == PileKind::Foundation && self.check_win(events);
        MoveReport {
            from: source.pile,
            to: target,
            cards: count,
            score_delta,
            flipped,
            won,
        }
    }

    pub(super) fn reject(&self, reason: Rejection, events: &mut EventBus) -> MoveOutcome {
        tracing::debug!(reason = reason.label(), "move rejected");
        events.push(Event::Rejected { reason });
        MoveOutcome::Rejected(reason)
    }
}
