//! Main follower executable entry point.
//!
//! # Architecture
//!
//! The executable runs the follower closed-loop against the kinematic
//! model:
//!
//!     - Initialise the session, logger and modules
//!     - Load the reference trajectory given on the command line
//!     - Main loop, one cycle per trajectory segment:
//!         - Follower processing: pose estimate in, drive signal out
//!         - Kinematic model processing: drive signal in, new pose out
//!     - Save the simulated pose trace into the session directory
//!
//! There is no real-time pacing - each cycle covers one segment time step
//! of simulated time and the loop runs as fast as it can. A deployment on
//! a vehicle would drive the same modules from a fixed-period loop and
//! replace the kinematic model with real localisation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report
};
use log::{debug, info, warn};
use std::env;

// Internal
use ramsete_lib::{
    kin_model::KinModel,
    ramsete_ctrl::{InputData, RamseteCtrl},
    traj::Trajectory
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("ramsete_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Ramsete Follower Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD TRAJECTORY ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // The only argument is the path to the reference trajectory produced by
    // the planner
    if args.len() != 2 {
        return Err(eyre!(
            "Expected path to the trajectory file as only argument, found {} arguments",
            args.len() - 1
        ));
    }

    info!("Loading trajectory from \"{}\"", &args[1]);

    let traj = Trajectory::from_json_file(&args[1])
        .wrap_err("Failed to load the trajectory")?;

    info!(
        "Loaded trajectory has {} segments lasting {:.02} s\n",
        traj.num_segments(),
        traj.total_duration_s()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ramsete_ctrl = RamseteCtrl::default();
    ramsete_ctrl.init("ramsete_ctrl.toml", &session)
        .wrap_err("Failed to initialise RamseteCtrl")?;
    info!("RamseteCtrl init complete");

    let mut kin_model = KinModel::init("kin_model.toml")
        .wrap_err("Failed to initialise KinModel")?;
    info!("KinModel init complete");

    // Both modules carry their own wheel base, a mismatch means the model
    // will not reproduce what the follower commanded
    if (ramsete_ctrl.params().wheel_base_m - kin_model.params().wheel_base_m)
        .abs()
        > f64::EPSILON
    {
        warn!(
            "RamseteCtrl wheel base ({} m) differs from KinModel wheel base ({} m)",
            ramsete_ctrl.params().wheel_base_m,
            kin_model.params().wheel_base_m
        );
    }

    info!("Module initialisation complete\n");

    ramsete_ctrl.load_trajectory(traj.clone())
        .wrap_err("Failed to load the trajectory into RamseteCtrl")?;

    // Seed the pose estimate from the start of the trajectory
    let mut pose = ramsete_ctrl.start_pose()
        .wrap_err("Failed to get the trajectory start pose")?;

    let mut pose_trace = vec![pose];

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    while !ramsete_ctrl.is_finished() {

        // Follower processing
        let (signal, report) = ramsete_ctrl.proc(&InputData { pose })
            .wrap_err("Error during RamseteCtrl processing")?;

        // Feed the commanded wheel speeds through the kinematic model over
        // the executed segment's time step.
        //
        // The unwrap is safe, the report's segment index was just executed
        let dt_s = traj.get(report.seg_index).unwrap().dt_s;
        pose = kin_model.step(&pose, &signal, dt_s);
        pose_trace.push(pose);

        debug!(
            "Seg {} of {}: signal = ({:.3}, {:.3}) m/s, pose = ({:.3}, {:.3}, {:.3})",
            report.seg_index,
            traj.num_segments() - 1,
            signal.left_ms,
            signal.right_ms,
            pose.position_m[0],
            pose.position_m[1],
            pose.heading_rad
        );
    }

    info!("Trajectory complete after {} cycles", pose_trace.len() - 1);

    // ---- SHUTDOWN ----

    // Save the simulated trace for offline plotting
    session.save("pose_trace.json", pose_trace);

    session.exit();

    info!("End of execution");

    Ok(())
}
