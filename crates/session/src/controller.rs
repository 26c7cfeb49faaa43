use document::RasterIo;
use driver::{InputCommand, PointerInput};
use model::BrushState;

use crate::{AnnotatorConfig, SampleSession, SessionError, Workbench};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Unchanged,
    Redraw,
    Saved,
    SampleChanged { index: usize },
}

/// Applies input commands and pointer events to the brush, workbench and session.
pub struct AnnotatorController<Io> {
    config: AnnotatorConfig,
    brush: BrushState,
    session: SampleSession<Io>,
    bench: Workbench,
}

impl<Io: RasterIo> AnnotatorController<Io> {
    pub fn new(
        config: AnnotatorConfig,
        session: SampleSession<Io>,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            brush: config.initial_brush(),
            config,
            session,
            bench: Workbench::new(viewport_width, viewport_height)?,
        })
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.session.load_first(&mut self.bench)?;
        Ok(())
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn workbench(&self) -> &Workbench {
        &self.bench
    }

    pub fn session(&self) -> &SampleSession<Io> {
        &self.session
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        self.bench.handle_pointer(&self.brush, input);
    }

    pub fn pointer_left(&mut self) {
        self.bench.pointer_left();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.bench.set_viewport_size(width, height);
    }

    pub fn handle_command(&mut self, command: InputCommand) -> Result<CommandOutcome, SessionError> {
        match command {
            InputCommand::ZoomIn { anchor_x, anchor_y } => {
                self.bench
                    .zoom_at(self.config.zoom_in_factor, anchor_x, anchor_y)?;
            }
            InputCommand::ZoomOut { anchor_x, anchor_y } => {
                self.bench
                    .zoom_at(self.config.zoom_out_factor, anchor_x, anchor_y)?;
            }
            InputCommand::ChangeBrushRadius { steps } => {
                let step = i32::try_from(self.config.brush_radius_step).unwrap_or(i32::MAX);
                self.brush.change_radius(steps.saturating_mul(step));
            }
            InputCommand::SetMode(mode) => self.brush.set_mode(mode),
            InputCommand::ToggleMode => {
                self.brush.toggle_mode();
            }
            InputCommand::SelectPaletteColor(index) => {
                let Some(color) = self.config.palette_color(index) else {
                    return Ok(CommandOutcome::Unchanged);
                };
                self.brush.set_color(color);
            }
            InputCommand::ResetView => self.bench.fit_view()?,
            InputCommand::ClearMask => self.bench.clear_mask()?,
            InputCommand::SaveMask => {
                self.session.save_current(&mut self.bench)?;
                return Ok(CommandOutcome::Saved);
            }
            InputCommand::Navigate(step) => {
                let index = self.session.advance(step, &mut self.bench)?;
                if step == 0 {
                    return Ok(CommandOutcome::Unchanged);
                }
                return Ok(CommandOutcome::SampleChanged { index });
            }
        }
        Ok(CommandOutcome::Redraw)
    }

    /// Saves the attached mask before the application exits.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        self.session.save_current(&mut self.bench)
    }
}

#[cfg(test)]
mod tests {
    use document::PngFileIo;
    use driver::PointerButton;
    use model::{BrushMode, Rgb};

    use super::*;
    use crate::SampleCatalog;
    use crate::test_support::{FixtureRoot, write_image};

    fn started_controller(name: &str) -> (FixtureRoot, AnnotatorController<PngFileIo>) {
        let root = FixtureRoot::new(name);
        for stem in ["a", "b"] {
            write_image(&root.images().join(format!("{stem}.png")), 50, 50);
        }
        let catalog = SampleCatalog::scan(root.path()).expect("scan samples");
        let session = SampleSession::new(catalog, PngFileIo);
        let mut controller =
            AnnotatorController::new(AnnotatorConfig::default(), session, 100, 100)
                .expect("create controller");
        controller.start().expect("start");
        (root, controller)
    }

    #[test]
    fn palette_selection_and_radius_steps_update_brush() {
        let (_root, mut controller) = started_controller("controller_brush");

        let outcome = controller
            .handle_command(InputCommand::SelectPaletteColor(2))
            .expect("select color");
        assert_eq!(outcome, CommandOutcome::Redraw);
        assert_eq!(controller.brush().color(), Rgb::GREEN);

        assert_eq!(
            controller.handle_command(InputCommand::SelectPaletteColor(9)),
            Ok(CommandOutcome::Unchanged)
        );
        assert_eq!(controller.brush().color(), Rgb::GREEN);

        controller
            .handle_command(InputCommand::ChangeBrushRadius { steps: -2 })
            .expect("shrink");
        assert_eq!(controller.brush().radius(), 15);
        controller
            .handle_command(InputCommand::ChangeBrushRadius { steps: -100 })
            .expect("shrink to minimum");
        assert_eq!(controller.brush().radius(), 1);

        controller
            .handle_command(InputCommand::SetMode(BrushMode::Erase))
            .expect("erase mode");
        assert_eq!(controller.brush().mode(), BrushMode::Erase);
        controller
            .handle_command(InputCommand::ToggleMode)
            .expect("toggle");
        assert_eq!(controller.brush().mode(), BrushMode::Paint);
    }

    #[test]
    fn painting_then_navigating_saves_and_switches_sample() {
        let (root, mut controller) = started_controller("controller_nav");
        assert_eq!(controller.workbench().view().zoom(), 2.0);

        controller.handle_pointer(PointerInput::down(PointerButton::Primary, 20.0, 20.0));
        controller.handle_pointer(PointerInput::moved(60.0, 20.0));
        controller.handle_pointer(PointerInput::up(PointerButton::Primary, 60.0, 20.0));
        let mask = controller.workbench().label_layer().mask();
        assert_eq!(mask.pixel(20, 10), Some(Rgb::BLACK.opaque()));

        let outcome = controller
            .handle_command(InputCommand::Navigate(1))
            .expect("navigate");
        assert_eq!(outcome, CommandOutcome::SampleChanged { index: 1 });
        assert!(root.labels().join("a.png").is_file());
        assert!(controller.workbench().label_layer().mask().is_fully_transparent());

        assert_eq!(
            controller.handle_command(InputCommand::Navigate(0)),
            Ok(CommandOutcome::Unchanged)
        );
    }

    #[test]
    fn zoom_commands_anchor_at_pointer_and_reset_refits() {
        let (_root, mut controller) = started_controller("controller_zoom");
        controller
            .handle_command(InputCommand::ZoomIn {
                anchor_x: 30.0,
                anchor_y: 70.0,
            })
            .expect("zoom in");
        let view = controller.workbench().view();
        assert!((view.zoom() - 2.5).abs() < 1e-5);
        let (x, y) = view.screen_to_canvas_point(30.0, 70.0).expect("to canvas");
        assert!((x - 15.0).abs() < 1e-4 && (y - 35.0).abs() < 1e-4);

        controller
            .handle_command(InputCommand::ResetView)
            .expect("reset view");
        assert_eq!(controller.workbench().view().zoom(), 2.0);
        assert_eq!(controller.workbench().view().offset_x(), 0.0);
    }

    #[test]
    fn clear_and_save_commands_touch_the_current_mask() {
        let (root, mut controller) = started_controller("controller_clear");
        controller.handle_pointer(PointerInput::down(PointerButton::Primary, 50.0, 50.0));
        controller.handle_pointer(PointerInput::up(PointerButton::Primary, 50.0, 50.0));
        assert!(!controller.workbench().label_layer().mask().is_fully_transparent());

        controller
            .handle_command(InputCommand::ClearMask)
            .expect("clear");
        assert!(controller.workbench().label_layer().mask().is_fully_transparent());
        assert_eq!(controller.workbench().label_layer().mask().size(), (50, 50));

        assert_eq!(
            controller.handle_command(InputCommand::SaveMask),
            Ok(CommandOutcome::Saved)
        );
        assert!(root.labels().join("a.png").is_file());
        assert!(!controller.workbench().label_layer().is_modified());
    }
}
