//! # Drivetrain arbiter
//!
//! Grants the drivetrain to at most one control unit at a time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};

use super::{ControlUnit, CycleContext};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Builds the unit which is run whenever no other unit holds the drivetrain.
pub type DefaultUnitFactory = Box<dyn FnMut() -> Box<dyn ControlUnit>>;

/// Owner of the drivetrain claim.
///
/// The previous owner's `end` hook always runs before a new unit is initialised, so the
/// drivetrain is left at rest across every hand over.
#[derive(Default)]
pub struct DrivetrainArbiter {
    active: Option<Box<dyn ControlUnit>>,

    default_factory: Option<DefaultUnitFactory>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DrivetrainArbiter {
    /// Create an arbiter with no default unit, it will sit idle when nothing claims the
    /// drivetrain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arbiter which runs the unit built by `factory` whenever the drivetrain is free.
    pub fn with_default(factory: DefaultUnitFactory) -> Self {
        Self {
            active: None,
            default_factory: Some(factory),
        }
    }

    /// Give the drivetrain to `unit`, interrupting the current owner.
    pub fn claim(&mut self, mut unit: Box<dyn ControlUnit>, ctx: &mut CycleContext) {
        self.interrupt_active(ctx);

        info!("{} claimed the drivetrain", unit.name());
        unit.initialise();
        self.active = Some(unit);
    }

    /// Interrupt the current owner, if any, leaving the drivetrain unclaimed.
    pub fn release(&mut self, ctx: &mut CycleContext) {
        self.interrupt_active(ctx);
    }

    /// Run one cycle of the active unit.
    ///
    /// If no unit is active the default unit is installed first. A unit which reports itself
    /// finished after executing is ended immediately.
    pub fn cycle(&mut self, ctx: &mut CycleContext) {
        if self.active.is_none() {
            if let Some(factory) = self.default_factory.as_mut() {
                let mut unit = factory();
                debug!("Installing default unit {}", unit.name());
                unit.initialise();
                self.active = Some(unit);
            }
        }

        let finished = match self.active.as_mut() {
            Some(unit) => {
                unit.execute(ctx);
                unit.is_finished()
            }
            None => false,
        };

        if finished {
            if let Some(mut unit) = self.active.take() {
                info!("{} finished", unit.name());
                unit.end(false, ctx);
            }
        }
    }

    /// Name of the unit currently holding the drivetrain.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|u| u.name())
    }

    /// True if no unit holds the drivetrain.
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    fn interrupt_active(&mut self, ctx: &mut CycleContext) {
        if let Some(mut prev) = self.active.take() {
            info!("Interrupting {}", prev.name());
            prev.end(true, ctx);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        drivetrain::{DrivetrainCmd, DrivetrainParams, SimDrivetrain},
        input::OperatorInput,
        loc::Pose,
        telemetry::MapTelemetry,
    };
    use std::{cell::RefCell, rc::Rc};

    /// Unit which drives forwards for a fixed number of cycles and logs its lifecycle.
    struct CountingUnit {
        name: &'static str,
        cycles_left: Option<usize>,
        events: Rc<RefCell<Vec<String>>>,
    }

    impl ControlUnit for CountingUnit {
        fn name(&self) -> &str {
            self.name
        }

        fn initialise(&mut self) {
            self.events.borrow_mut().push(format!("{} init", self.name));
        }

        fn execute(&mut self, ctx: &mut CycleContext) {
            ctx.drivetrain.set_open_loop(0.1, 0.1);
            if let Some(n) = self.cycles_left.as_mut() {
                *n = n.saturating_sub(1);
            }
            self.events.borrow_mut().push(format!("{} exec", self.name));
        }

        fn is_finished(&self) -> bool {
            self.cycles_left == Some(0)
        }

        fn end(&mut self, interrupted: bool, ctx: &mut CycleContext) {
            ctx.drivetrain.stop();
            self.events
                .borrow_mut()
                .push(format!("{} end {}", self.name, interrupted));
        }
    }

    fn sim() -> SimDrivetrain {
        SimDrivetrain::new(
            &DrivetrainParams {
                track_width_m: 0.6,
                top_speed_ms: 3.0,
                ks_v: 0.0,
                kv_vspm: 3.0,
                ka_vsspm: 0.3,
            },
            Pose::default(),
        )
    }

    #[test]
    fn test_claim_interrupts_previous() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut dt = sim();
        let mut tm = MapTelemetry::new();
        let mut ctx = CycleContext {
            input: OperatorInput::default(),
            pose: Pose::default(),
            cycle_period_s: 0.02,
            drivetrain: &mut dt,
            telemetry: &mut tm,
        };

        let mut arb = DrivetrainArbiter::new();
        arb.cycle(&mut ctx);
        assert!(arb.is_idle());

        arb.claim(
            Box::new(CountingUnit {
                name: "a",
                cycles_left: None,
                events: events.clone(),
            }),
            &mut ctx,
        );
        arb.cycle(&mut ctx);
        arb.claim(
            Box::new(CountingUnit {
                name: "b",
                cycles_left: None,
                events: events.clone(),
            }),
            &mut ctx,
        );
        assert_eq!(arb.active_name(), Some("b"));
        arb.release(&mut ctx);
        assert!(arb.is_idle());

        assert_eq!(
            *events.borrow(),
            vec!["a init", "a exec", "a end true", "b init", "b end true"]
        );
        assert_eq!(
            dt.history(),
            &[
                DrivetrainCmd::OpenLoop {
                    left: 0.1,
                    right: 0.1
                },
                DrivetrainCmd::Stop,
                DrivetrainCmd::Stop
            ]
        );
    }

    #[test]
    fn test_default_unit_reinstalled() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let factory_events = events.clone();
        let mut dt = sim();
        let mut tm = MapTelemetry::new();
        let mut ctx = CycleContext {
            input: OperatorInput::default(),
            pose: Pose::default(),
            cycle_period_s: 0.02,
            drivetrain: &mut dt,
            telemetry: &mut tm,
        };

        let mut arb = DrivetrainArbiter::with_default(Box::new(move || {
            Box::new(CountingUnit {
                name: "default",
                cycles_left: None,
                events: factory_events.clone(),
            }) as Box<dyn ControlUnit>
        }));

        arb.cycle(&mut ctx);
        assert_eq!(arb.active_name(), Some("default"));

        // A finite unit takes over, finishes, and the default comes back
        arb.claim(
            Box::new(CountingUnit {
                name: "once",
                cycles_left: Some(1),
                events: events.clone(),
            }),
            &mut ctx,
        );
        arb.cycle(&mut ctx);
        assert!(arb.is_idle());
        arb.cycle(&mut ctx);
        assert_eq!(arb.active_name(), Some("default"));

        assert_eq!(
            *events.borrow(),
            vec![
                "default init",
                "default exec",
                "default end true",
                "once init",
                "once exec",
                "once end false",
                "default init",
                "default exec"
            ]
        );
    }
}
