use super::*;
use crate::rules::movable_unit;
use crate::EventBus;

impl Game {
    /// Picks up the card at `source[card_index]` together with everything
    /// that travels with it. Face-down and stock cards are never draggable.
    pub fn begin_drag(
        &mut self,
        card: Card,
        source: PileRef,
        card_index: usize,
    ) -> Result<DragGrant, EngineError> {
        self.card_at(source, card_index, &card)?;
        self.drag = None;
        if self.phase != Phase::Playing {
            return Ok(DragGrant::denied());
        }
        let pile = self
            .board
            .pile(source)
            .ok_or(EngineError::PileOutOfRange(source))?;
        let Some(unit) = movable_unit(source.kind, pile, card_index) else {
            return Ok(DragGrant::denied());
        };
        let grant = DragGrant {
            unit: unit.to_vec(),
            permitted: true,
        };
        self.drag = Some(PendingDrag {
            card,
            source: MoveSource::new(source, card_index),
        });
        Ok(grant)
    }

    /// Drops the pending drag on `target`. Legality is decided against the
    /// board as it is now, not as it was when the drag began.
    pub fn drop(&mut self, target: PileRef, events: &mut EventBus) -> Result<MoveOutcome, EngineError> {
        let Some(pending) = self.drag.take() else {
            return Ok(self.reject(Rejection::NoDrag, events));
        };
        let still_there = self
            .board
            .pile(pending.source.pile)
            .and_then(|pile| pile.get(pending.source.card_index))
            .is_some_and(|card| card.face_up && card.same_identity(&pending.card));
        if !still_there {
            return Ok(self.reject(Rejection::StaleDrag, events));
        }
        self.apply_move(pending.source, target, events)
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }
}
