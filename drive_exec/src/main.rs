//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Build the autonomous container, generating the autonomous path once
//!     - Main loop:
//!         - Operator input acquisition
//!         - Pose estimate acquisition
//!         - Control unit processing through the drivetrain arbiter
//!         - Drivetrain simulation step
//!     - Release the drivetrain and save the session data

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use drive_lib::{
    auto::{AutoContainer, AutoParams},
    control::{ControlUnit, CycleContext, DrivetrainArbiter},
    drive_ctrl::{self, DriveCtrl, DriveMode},
    drivetrain::{DrivetrainParams, SimDrivetrain},
    input::{InputSource, OperatorInput, ScriptedInput},
    loc::Pose,
    params::ExecParams,
    telemetry::MapTelemetry,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Differential drive control executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "drive_exec")]
enum Cli {
    /// Drive using operator input replayed from a script.
    #[structopt(name = "teleop")]
    Teleop {
        /// The drive mode, one of open-loop, cheesy-open-loop or cheesy-closed-loop.
        #[structopt(short, long, default_value = "cheesy-closed-loop")]
        mode: DriveMode,

        /// Path to the operator input script.
        #[structopt(parse(from_os_str))]
        script: PathBuf,
    },

    /// Follow the autonomous path, then stop.
    #[structopt(name = "auto")]
    Auto,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let cli = Cli::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("drive_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Differential Drive Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", cli);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        util::params::load("exec.toml").wrap_err("Could not load exec params")?;
    let drive_ctrl_params: drive_ctrl::Params =
        util::params::load("drive_ctrl.toml").wrap_err("Could not load DriveCtrl params")?;
    let drivetrain_params: DrivetrainParams =
        util::params::load("drivetrain.toml").wrap_err("Could not load drivetrain params")?;
    let auto_params: AutoParams =
        util::params::load("auto.toml").wrap_err("Could not load autonomous params")?;

    info!("Parameters loaded");

    // ---- INITIALISE AUTONOMOUS CONTAINER ----

    // Only autonomous operation depends on the path, teleop carries on without it
    let auto_container = match AutoContainer::new(&auto_params, &drivetrain_params) {
        Ok(ac) => Some(ac),
        Err(e) => match cli {
            Cli::Auto => {
                return Err(e).wrap_err("Failed to initialise the autonomous container");
            }
            Cli::Teleop { .. } => {
                warn!("Autonomous path unavailable: {}", e);
                None
            }
        },
    };

    // ---- INITIALISE CONTROL ----

    let start_pose = match &auto_container {
        Some(ac) => ac
            .path()
            .start()
            .map(|s| s.pose)
            .unwrap_or_else(Pose::default),
        None => Pose::default(),
    };

    let mut sim = SimDrivetrain::new(&drivetrain_params, start_pose);
    let mut telemetry = MapTelemetry::new();

    let (mut input, mut arbiter, mut pending_unit): (
        Option<ScriptedInput>,
        DrivetrainArbiter,
        Option<Box<dyn ControlUnit>>,
    ) = match &cli {
        Cli::Teleop { mode, script } => {
            info!("Loading input script from {:?}", script);

            let input = ScriptedInput::new(script, exec_params.input_deadband)
                .wrap_err("Failed to load the input script")?;

            // Teleop drive is the default unit, reinstalled whenever the drivetrain is free
            let mode = *mode;
            let dt_params = drivetrain_params.clone();
            let arbiter = DrivetrainArbiter::with_default(Box::new(move || {
                Box::new(DriveCtrl::new(mode, drive_ctrl_params.clone(), &dt_params))
                    as Box<dyn ControlUnit>
            }));

            (Some(input), arbiter, None)
        }
        Cli::Auto => {
            let routine = auto_container
                .as_ref()
                .map(|ac| Box::new(ac.autonomous_routine()) as Box<dyn ControlUnit>);

            (None, DrivetrainArbiter::new(), routine)
        }
    };

    info!("Control initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let mut num_cycles: u64 = 0;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Simulated time since the start of the loop
        let run_time_s = num_cycles as f64 * exec_params.cycle_period_s;

        // ---- DATA INPUT ----

        let op_input = match input.as_mut() {
            Some(i) => i.read(run_time_s),
            None => OperatorInput::default(),
        };

        // ---- CONTROL PROCESSING ----

        {
            let pose = sim.pose();
            let mut ctx = CycleContext {
                input: op_input,
                pose,
                cycle_period_s: exec_params.cycle_period_s,
                drivetrain: &mut sim,
                telemetry: &mut telemetry,
            };

            if let Some(unit) = pending_unit.take() {
                arbiter.claim(unit, &mut ctx);
            }

            arbiter.cycle(&mut ctx);
        }

        sim.step(exec_params.cycle_period_s);

        num_cycles += 1;

        // ---- EXIT CONDITIONS ----

        let done = match &cli {
            Cli::Teleop { .. } => input.as_ref().map(|i| i.is_finished()).unwrap_or(true),
            Cli::Auto => arbiter.is_idle(),
        };

        if done {
            info!("Run complete after {} cycles", num_cycles);
            break;
        }

        if run_time_s >= exec_params.max_run_time_s {
            warn!(
                "Maximum run time of {:.02} s reached, stopping",
                exec_params.max_run_time_s
            );
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            ),
        }
    }

    // ---- SHUTDOWN ----

    // Release the drivetrain so the active unit stops it
    {
        let pose = sim.pose();
        let mut ctx = CycleContext {
            input: OperatorInput::default(),
            pose,
            cycle_period_s: exec_params.cycle_period_s,
            drivetrain: &mut sim,
            telemetry: &mut telemetry,
        };
        arbiter.release(&mut ctx);
    }

    info!("Final pose: {:?}", sim.pose());

    session.save("telemetry.json", telemetry);
    session.save("final_pose.json", sim.pose());
    session.save("drivetrain_cmds.json", sim.history().to_vec());

    info!("End of execution");

    session.exit();

    Ok(())
}
