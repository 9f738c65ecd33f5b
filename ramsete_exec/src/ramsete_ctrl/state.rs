//! Implementations for the RamseteCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Serialize;

// Internal
use super::{DriveSignal, InitError, Params, RamseteCtrlError};
use crate::loc::Pose;
use crate::traj::{TrajSegment, Trajectory};
use util::{
    archive::Archiver,
    maths::sinc,
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Ramsete follower module state
#[derive(Default)]
pub struct RamseteCtrl {
    params: Params,

    /// The trajectory currently being executed, if any.
    traj: Option<Trajectory>,

    /// Index of the segment to be executed on the next cycle.
    ///
    /// Counts monotonically from 0 up to the number of segments, the latter
    /// being the finished state.
    seg_index: usize,

    /// Latest pose estimate, as supplied by the caller.
    pose: Pose,

    report: StatusReport,
    arch_report: Archiver
}

/// Input data to the module
#[derive(Copy, Clone)]
pub struct InputData {
    /// The latest pose estimate of the vehicle. Accepted as given - the
    /// quality of the estimate is the localisation source's concern.
    pub pose: Pose
}

/// The status report containing monitoring quantities for one cycle.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Index of the segment this cycle executed.
    pub seg_index: usize,

    /// The heading error to the executed segment.
    pub head_error_rad: f64,

    /// Commanded linear velocity.
    pub lin_vel_ms: f64,

    /// Commanded angular velocity.
    pub ang_vel_rads: f64,

    /// True once the whole trajectory has been executed.
    pub finished: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for RamseteCtrl {
    type InitData = &'static str;
    type InitError = InitError;

    type InputData = InputData;
    type OutputData = DriveSignal;
    type StatusReport = StatusReport;
    type ProcError = RamseteCtrlError;

    /// Initialise the RamseteCtrl module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(
        &mut self,
        init_data: Self::InitData,
        session: &Session
    ) -> Result<(), Self::InitError> {
        // Load the parameters
        self.params = params::load(init_data)?;

        // Reject parameters which make the law meaningless
        if self.params.wheel_base_m <= 0.0 {
            return Err(InitError::NonPositiveWheelBase(self.params.wheel_base_m));
        }
        if self.params.b <= 0.0 {
            return Err(InitError::NonPositiveGain(self.params.b));
        }

        // An out of range damping factor still computes, but the law no
        // longer guarantees convergence, so flag it rather than fail
        if !(0.0..1.0).contains(&self.params.zeta) {
            warn!(
                "zeta = {} is outside [0, 1), convergence is not guaranteed",
                self.params.zeta
            );
        }

        // Create the archive folder for ramsete_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("ramsete_ctrl");
        std::fs::create_dir_all(arch_path).unwrap();

        // Initialise the archiver
        self.arch_report = Archiver::from_path(
            session, "ramsete_ctrl/status_report.csv"
        ).unwrap();

        Ok(())
    }

    /// Process one cycle of the follower.
    ///
    /// Processing involves:
    ///  1. Updating the internal pose estimate from the input.
    ///  2. Computing the wheel speed demand for the current segment.
    ///  3. Advancing to the next segment.
    fn proc(
        &mut self,
        input_data: &Self::InputData
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {

        // Setup cycle data
        self.pose = input_data.pose;
        self.report = StatusReport::default();
        self.report.seg_index = self.seg_index;

        // Once the trajectory is complete the stop demand is held without
        // consuming the index, so repeated calls are harmless
        if self.is_finished() {
            self.report.finished = true;
            return Ok((DriveSignal::stop(), self.report));
        }

        // Get the executing segment and the demanded turn rate over it.
        //
        // The unwraps are safe: is_finished has confirmed a trajectory is
        // loaded and the index is within it.
        let (seg, w_d) = {
            let traj = self.traj.as_ref().unwrap();
            (
                *traj.get(self.seg_index).unwrap(),
                self.calc_turn_rate_demand(traj)
            )
        };

        let lin_vel_ms = self.calc_lin_vel(&seg, w_d);
        let ang_vel_rads = self.calc_ang_vel(&seg, w_d);

        debug!(
            "Seg {}: v = {:.4} m/s, w = {:.4} rad/s",
            self.seg_index, lin_vel_ms, ang_vel_rads
        );

        // Convert the body rates into left and right wheel speeds
        let signal = DriveSignal::from_body_rates(
            lin_vel_ms,
            ang_vel_rads,
            self.params.wheel_base_m
        );

        self.report.head_error_rad = seg.heading_rad - self.pose.heading_rad;
        self.report.lin_vel_ms = lin_vel_ms;
        self.report.ang_vel_rads = ang_vel_rads;

        // Advance to the next segment
        self.seg_index += 1;

        // Archive the report
        if let Err(e) = self.arch_report.serialise(self.report) {
            warn!("Could not archive RamseteCtrl status report: {}", e);
        }

        Ok((signal, self.report))
    }
}

impl RamseteCtrl {

    /// Begin executing a trajectory.
    ///
    /// Execution starts on the next call to `proc`. Loading a new trajectory
    /// while a previous one is still executing is an error; once the current
    /// trajectory has finished a new one may be loaded, which resets the
    /// follower to the start of it.
    pub fn load_trajectory(
        &mut self, traj: Trajectory
    ) -> Result<(), RamseteCtrlError> {

        if !self.is_finished() {
            return Err(RamseteCtrlError::TrajAlreadyLoaded);
        }

        self.seg_index = 0;
        self.traj = Some(traj);

        Ok(())
    }

    /// The pose of the first trajectory segment.
    ///
    /// Callers running closed-loop in simulation use this to seed their own
    /// pose tracking before the first cycle.
    pub fn start_pose(&self) -> Result<Pose, RamseteCtrlError> {
        match self.traj {
            // The unwrap is safe, trajectories are validated non-empty on
            // construction
            Some(ref t) => Ok(t.get(0).unwrap().pose()),
            None => Err(RamseteCtrlError::NoTrajLoaded)
        }
    }

    /// True once every segment of the trajectory has been executed.
    ///
    /// Vacuously true when no trajectory has been loaded.
    pub fn is_finished(&self) -> bool {
        match self.traj {
            Some(ref t) => self.seg_index == t.num_segments(),
            None => true
        }
    }

    /// The follower's parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Demanded turn rate over the executing segment.
    ///
    /// Taken as the forward difference of neighbouring segment headings over
    /// the executing segment's time step. The last segment has no lookahead
    /// so its demand is zero.
    fn calc_turn_rate_demand(&self, traj: &Trajectory) -> f64 {
        if self.seg_index < traj.num_segments() - 1 {
            // The unwraps are safe, both indices are in range here
            let this_seg = traj.get(self.seg_index).unwrap();
            let next_seg = traj.get(self.seg_index + 1).unwrap();

            (next_seg.heading_rad - this_seg.heading_rad) / this_seg.dt_s
        }
        else {
            0.0
        }
    }

    /// Time-varying feedback gain (from eq. 5.12 of the paper).
    fn calc_gain(&self, v_d: f64, w_d: f64) -> f64 {
        2.0 * self.params.zeta
            * (w_d.powi(2) + self.params.b * v_d.powi(2)).sqrt()
    }

    /// Linear velocity demand: feed-forward projected through the heading
    /// error, plus the gain applied to the along-track position error (from
    /// eq. 5.12 of the paper).
    fn calc_lin_vel(&self, seg: &TrajSegment, w_d: f64) -> f64 {
        let k = self.calc_gain(seg.velocity_ms, w_d);
        let head_err_rad = seg.heading_rad - self.pose.heading_rad;
        let (sin_head, cos_head) = self.pose.heading_rad.sin_cos();

        seg.velocity_ms * head_err_rad.cos()
            + k * (cos_head * (seg.x_m - self.pose.position_m[0])
                + sin_head * (seg.y_m - self.pose.position_m[1]))
    }

    /// Angular velocity demand: turn rate feed-forward, cross-track
    /// correction scaled by sinc of the heading error, and the gain applied
    /// to the heading error itself (from eq. 5.12 of the paper).
    fn calc_ang_vel(&self, seg: &TrajSegment, w_d: f64) -> f64 {
        let k = self.calc_gain(seg.velocity_ms, w_d);
        let head_err_rad = seg.heading_rad - self.pose.heading_rad;
        let (sin_head, cos_head) = self.pose.heading_rad.sin_cos();

        w_d + self.params.b
            * seg.velocity_ms
            * sinc(head_err_rad)
            * (cos_head * (seg.y_m - self.pose.position_m[1])
                - sin_head * (seg.x_m - self.pose.position_m[0]))
            + k * head_err_rad
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::traj::TrajSegment;

    /// Build a follower with the given gains, bypassing parameter files.
    fn ctrl(b: f64, zeta: f64, wheel_base_m: f64) -> RamseteCtrl {
        RamseteCtrl {
            params: Params { b, zeta, wheel_base_m },
            ..Default::default()
        }
    }

    fn seg(
        x_m: f64, y_m: f64, heading_rad: f64, velocity_ms: f64
    ) -> TrajSegment {
        TrajSegment {
            x_m,
            y_m,
            heading_rad,
            velocity_ms,
            dt_s: 0.1
        }
    }

    #[test]
    fn test_advance_and_terminal_hold() {
        let mut ctrl = ctrl(15.0, 0.9, 2.5);
        ctrl.load_trajectory(
            Trajectory::from_segments(vec![
                seg(0.0, 0.0, 0.0, 1.0),
                seg(0.1, 0.0, 0.0, 1.0),
                seg(0.2, 0.0, 0.0, 1.0)
            ]).unwrap()
        ).unwrap();

        let input = InputData {
            pose: Pose::from_planar(0.0, 0.0, 0.0)
        };

        // Each cycle advances the index by exactly one
        for i in 0..3 {
            assert!(!ctrl.is_finished());
            assert_eq!(ctrl.seg_index, i);

            let (_, report) = ctrl.proc(&input).unwrap();
            assert_eq!(report.seg_index, i);
            assert!(!report.finished);
        }

        // After consuming every segment the follower is finished and holds
        // the stop demand without moving the index
        assert!(ctrl.is_finished());

        for _ in 0..4 {
            let (signal, report) = ctrl.proc(&input).unwrap();
            assert_eq!(signal.left_ms, 0.0);
            assert_eq!(signal.right_ms, 0.0);
            assert!(report.finished);
            assert_eq!(ctrl.seg_index, 3);
        }
    }

    #[test]
    fn test_zero_error_recovers_feed_forward() {
        let mut ctrl = ctrl(15.0, 0.9, 2.5);
        ctrl.load_trajectory(
            Trajectory::from_segments(vec![seg(1.0, 2.0, 0.3, 0.75)]).unwrap()
        ).unwrap();

        // Pose exactly on the segment, single segment so no turn rate
        // demand: the command collapses to the feed-forward speed, straight
        // ahead
        let (signal, report) = ctrl.proc(&InputData {
            pose: Pose::from_planar(1.0, 2.0, 0.3)
        }).unwrap();

        assert!((signal.left_ms - 0.75).abs() < 1e-9);
        assert!((signal.right_ms - 0.75).abs() < 1e-9);
        assert!(report.head_error_rad.abs() < 1e-12);
        assert!(report.ang_vel_rads.abs() < 1e-9);
    }

    #[test]
    fn test_reference_scenario() {
        // Hand-computed point: k = 2*0.9*sqrt(15) and the full along-track
        // error is picked up by the linear velocity
        let mut ctrl = ctrl(15.0, 0.9, 2.5);
        ctrl.load_trajectory(
            Trajectory::from_segments(vec![seg(1.0, 0.0, 0.0, 1.0)]).unwrap()
        ).unwrap();

        let (signal, report) = ctrl.proc(&InputData {
            pose: Pose::from_planar(0.0, 0.0, 0.0)
        }).unwrap();

        let k = 1.8 * 15f64.sqrt();
        assert!((report.lin_vel_ms - (1.0 + k)).abs() < 1e-3);
        assert!(report.ang_vel_rads.abs() < 1e-9);

        assert!((signal.left_ms - 7.9714).abs() < 1e-3);
        assert!((signal.right_ms - 7.9714).abs() < 1e-3);
    }

    #[test]
    fn test_turn_rate_demand_lookahead() {
        // Two segments turning 0.1 rad over 0.1 s: the first cycle demands
        // 1 rad/s, the last (no lookahead) demands none
        let mut ctrl = ctrl(15.0, 0.9, 2.5);
        ctrl.load_trajectory(
            Trajectory::from_segments(vec![
                seg(0.0, 0.0, 0.0, 1.0),
                seg(0.1, 0.0, 0.1, 1.0)
            ]).unwrap()
        ).unwrap();

        // On-segment pose zeroes every error term, leaving the raw demands
        let (signal, report) = ctrl.proc(&InputData {
            pose: Pose::from_planar(0.0, 0.0, 0.0)
        }).unwrap();

        assert!((report.ang_vel_rads - 1.0).abs() < 1e-9);
        assert!((signal.left_ms - (1.0 - 2.5 * 0.5)).abs() < 1e-9);
        assert!((signal.right_ms - (1.0 + 2.5 * 0.5)).abs() < 1e-9);

        let (_, report) = ctrl.proc(&InputData {
            pose: Pose::from_planar(0.1, 0.0, 0.1)
        }).unwrap();
        assert!(report.ang_vel_rads.abs() < 1e-9);
    }

    #[test]
    fn test_closed_loop_converges_from_offset_start() {
        use crate::kin_model::{
            IntegrationMethod, KinModel, Params as KinParams
        };

        // Straight constant-speed trajectory along the X axis
        let mut segments = Vec::new();
        for i in 0..100 {
            segments.push(TrajSegment {
                x_m: 0.02 * i as f64,
                y_m: 0.0,
                heading_rad: 0.0,
                velocity_ms: 1.0,
                dt_s: 0.02
            });
        }
        let traj = Trajectory::from_segments(segments).unwrap();
        let final_target = traj.get(99).unwrap().pose();

        let mut ctrl = ctrl(2.0, 0.7, 0.5);
        ctrl.load_trajectory(traj.clone()).unwrap();

        let mut model = KinModel::from_params(KinParams {
            wheel_base_m: 0.5,
            method: IntegrationMethod::HeadingFirstEuler,
            dt_jitter: None,
            seed: 0
        }).unwrap();

        // Start half a vehicle width off the trajectory
        let mut pose = Pose::from_planar(0.0, 0.1, 0.0);

        while !ctrl.is_finished() {
            let (signal, report) = ctrl.proc(&InputData { pose }).unwrap();
            let dt_s = traj.get(report.seg_index).unwrap().dt_s;
            pose = model.step(&pose, &signal, dt_s);
        }

        // The loop must have pulled the vehicle onto the line and carried
        // it to the end of the trajectory
        let error_m = (pose.position_m - final_target.position_m).norm();
        assert!(error_m < 0.05, "final position error {} m", error_m);
        assert!(pose.position_m[1].abs() < 0.02);
    }

    #[test]
    fn test_trajectory_load_guard() {
        let traj = Trajectory::from_segments(vec![
            seg(0.0, 0.0, 0.0, 1.0)
        ]).unwrap();

        let mut ctrl = ctrl(15.0, 0.9, 2.5);

        // Nothing loaded yet: finished is vacuously true, no start pose
        assert!(ctrl.is_finished());
        assert!(matches!(
            ctrl.start_pose(),
            Err(RamseteCtrlError::NoTrajLoaded)
        ));

        ctrl.load_trajectory(traj.clone()).unwrap();
        assert_eq!(ctrl.start_pose().unwrap(), Pose::default());

        // Mid-execution reload is rejected
        assert!(matches!(
            ctrl.load_trajectory(traj.clone()),
            Err(RamseteCtrlError::TrajAlreadyLoaded)
        ));

        // After completion a new trajectory resets the follower
        ctrl.proc(&InputData { pose: Pose::default() }).unwrap();
        assert!(ctrl.is_finished());

        ctrl.load_trajectory(traj).unwrap();
        assert_eq!(ctrl.seg_index, 0);
        assert!(!ctrl.is_finished());
    }
}
