use model::ScenePoint;

use crate::{PointerButton, PointerEventPhase};

/// Pointer event already mapped into scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeEvent {
    pub phase: PointerEventPhase,
    pub button: Option<PointerButton>,
    pub point: ScenePoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeGestureState {
    #[default]
    Idle,
    Stroking {
        last: ScenePoint,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub from: ScenePoint,
    pub to: ScenePoint,
}

/// One step of the paint gesture.
///
/// Primary down starts a stroke and emits a zero-length segment, every move
/// while stroking emits the segment from the previous point, and primary up
/// (or cancel) ends the stroke. Anything else is ignored.
pub fn advance_stroke(
    state: StrokeGestureState,
    event: StrokeEvent,
) -> (StrokeGestureState, Option<StrokeSegment>) {
    let point = event.point;
    match (state, event.phase) {
        (StrokeGestureState::Idle, PointerEventPhase::Down)
            if event.button == Some(PointerButton::Primary) =>
        {
            (
                StrokeGestureState::Stroking { last: point },
                Some(StrokeSegment {
                    from: point,
                    to: point,
                }),
            )
        }
        (StrokeGestureState::Stroking { last }, PointerEventPhase::Move) => (
            StrokeGestureState::Stroking { last: point },
            Some(StrokeSegment {
                from: last,
                to: point,
            }),
        ),
        (StrokeGestureState::Stroking { .. }, PointerEventPhase::Up)
            if event.button == Some(PointerButton::Primary) =>
        {
            (StrokeGestureState::Idle, None)
        }
        (StrokeGestureState::Stroking { .. }, PointerEventPhase::Cancel) => {
            (StrokeGestureState::Idle, None)
        }
        (state, _) => (state, None),
    }
}
