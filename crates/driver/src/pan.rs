use crate::{PointerButton, PointerEventPhase, PointerInput};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanGestureState {
    #[default]
    Idle,
    Panning {
        last_x: f32,
        last_y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDelta {
    pub delta_x: f32,
    pub delta_y: f32,
}

/// Secondary-button drag in device pixels; the delta follows the pointer.
pub fn advance_pan(state: PanGestureState, input: PointerInput) -> (PanGestureState, Option<PanDelta>) {
    match (state, input.phase) {
        (PanGestureState::Idle, PointerEventPhase::Down)
            if input.button == Some(PointerButton::Secondary) =>
        {
            (
                PanGestureState::Panning {
                    last_x: input.screen_x,
                    last_y: input.screen_y,
                },
                None,
            )
        }
        (PanGestureState::Panning { last_x, last_y }, PointerEventPhase::Move) => (
            PanGestureState::Panning {
                last_x: input.screen_x,
                last_y: input.screen_y,
            },
            Some(PanDelta {
                delta_x: input.screen_x - last_x,
                delta_y: input.screen_y - last_y,
            }),
        ),
        (PanGestureState::Panning { .. }, PointerEventPhase::Up)
            if input.button == Some(PointerButton::Secondary) =>
        {
            (PanGestureState::Idle, None)
        }
        (PanGestureState::Panning { .. }, PointerEventPhase::Cancel) => {
            (PanGestureState::Idle, None)
        }
        (state, _) => (state, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_reports_deltas_only_while_secondary_is_held() {
        let (state, delta) = advance_pan(PanGestureState::Idle, PointerInput::moved(4.0, 4.0));
        assert_eq!(state, PanGestureState::Idle);
        assert_eq!(delta, None);

        let (state, delta) = advance_pan(
            state,
            PointerInput::down(PointerButton::Secondary, 10.0, 20.0),
        );
        assert_eq!(delta, None);

        let (state, delta) = advance_pan(state, PointerInput::moved(13.0, 15.0));
        assert_eq!(
            delta,
            Some(PanDelta {
                delta_x: 3.0,
                delta_y: -5.0,
            })
        );

        let (state, _) = advance_pan(state, PointerInput::up(PointerButton::Secondary, 13.0, 15.0));
        assert_eq!(state, PanGestureState::Idle);
        let (_, delta) = advance_pan(state, PointerInput::moved(50.0, 50.0));
        assert_eq!(delta, None);
    }

    #[test]
    fn primary_button_does_not_pan() {
        let (state, _) = advance_pan(
            PanGestureState::Idle,
            PointerInput::down(PointerButton::Primary, 1.0, 1.0),
        );
        assert_eq!(state, PanGestureState::Idle);
    }
}
