//! Integration test: goal intake through the control loop.
//!
//! Idempotence on repeated goals, frame purity on rejection, goal echo, and
//! Euler-ZYX projection into the goal segment.

use std::f64::consts::FRAC_PI_4;

use wbc_common::messages::Quaternion;
use wbc_controller::lifecycle::RunState;

use super::*;

#[test]
fn accepted_goal_fills_segment_and_is_echoed() {
    let mut control = proportional_loop();
    let g = goal(1.0, -0.5);

    control.on_goal(&g);

    let s = control.state().as_slice();
    assert_eq!(&s[2..8], &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(&s[8..14], &[-0.5, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(control.sink().current_goal(), Some(&g));
    assert_eq!(control.stats().goals_accepted, 1);
    assert_eq!(control.run_state(), RunState::Running);
}

#[test]
fn orientation_is_stored_as_euler_zyx() {
    let mut control = proportional_loop();
    // 90° about z on the left arm.
    let yaw = Quaternion::new(0.0, 0.0, FRAC_PI_4.sin(), FRAC_PI_4.cos());
    let g = WholeBodyGoal {
        left_ee_goal: framed(FRAME, 0.1, 0.2, 0.3, yaw),
        right_ee_goal: framed(FRAME, 0.4, 0.5, 0.6, Quaternion::IDENTITY),
    };

    control.on_goal(&g);

    let left = &control.state().as_slice()[2..8];
    assert_eq!(&left[..3], &[0.1, 0.2, 0.3]);
    assert!((left[3] - 2.0 * FRAC_PI_4).abs() < 1e-9, "yaw = {}", left[3]);
    assert!(left[4].abs() < 1e-9);
    assert!(left[5].abs() < 1e-9);
}

#[test]
fn zero_quaternion_projects_as_identity() {
    let mut control = proportional_loop();
    let g = WholeBodyGoal {
        left_ee_goal: framed(FRAME, 1.0, 0.0, 0.0, Quaternion::new(0.0, 0.0, 0.0, 0.0)),
        right_ee_goal: framed(FRAME, 1.0, 0.0, 0.0, Quaternion::IDENTITY),
    };

    control.on_goal(&g);

    assert_eq!(control.stats().goals_accepted, 1);
    assert_eq!(&control.state().as_slice()[5..8], &[0.0, 0.0, 0.0]);
}

#[test]
fn repeated_goal_is_a_no_op() {
    let mut control = proportional_loop();
    let g = goal(1.0, 1.0);

    control.on_goal(&g);
    let before = control.state().clone();
    control.on_goal(&g);
    control.on_goal(&g.clone());

    let stats = control.stats();
    assert_eq!(stats.goals_accepted, 1);
    assert_eq!(stats.goals_duplicate, 2);
    assert_eq!(stats.start_attempts, 1);
    assert_eq!(control.sink().counts().goals, 1);
    assert_eq!(control.state(), &before);
}

#[test]
fn changed_goal_replaces_previous_one() {
    let mut control = proportional_loop();
    control.on_goal(&goal(1.0, 1.0));
    control.on_goal(&goal(2.0, 1.0));

    assert_eq!(control.state().as_slice()[2], 2.0);
    assert_eq!(control.stats().goals_accepted, 2);
    assert_eq!(control.sink().counts().goals, 2);
    // Already running: the second goal must not restart the solver.
    assert_eq!(control.stats().start_attempts, 1);
}

#[test]
fn frame_mismatch_leaves_state_untouched() {
    let mut control = proportional_loop();
    let mut g = goal(1.0, 1.0);
    g.right_ee_goal.frame_id = "odom".to_string();

    control.on_goal(&g);

    assert!(control.state().goal_segment().iter().all(|&v| v == 0.0));
    assert_eq!(control.run_state(), RunState::Stopped);
    assert_eq!(control.sink().current_goal(), None);
    assert_eq!(control.stats().goals_rejected, 1);
    assert_eq!(control.stats().start_attempts, 0);
}

#[test]
fn left_frame_mismatch_does_not_write_right_arm() {
    let mut control = proportional_loop();
    let mut g = goal(1.0, 1.0);
    g.left_ee_goal.frame_id = "odom".to_string();

    control.on_goal(&g);

    assert!(control.state().goal_segment().iter().all(|&v| v == 0.0));
}

#[test]
fn repeated_rejected_goal_counts_as_duplicate() {
    let mut control = proportional_loop();
    let mut bad = goal(1.0, 1.0);
    bad.left_ee_goal.frame_id = "map".to_string();

    control.on_goal(&bad);
    control.on_goal(&bad);

    assert_eq!(control.stats().goals_rejected, 1);
    assert_eq!(control.stats().goals_duplicate, 1);

    // A corrected goal goes through.
    control.on_goal(&goal(1.0, 1.0));
    assert_eq!(control.stats().goals_accepted, 1);
    assert_eq!(control.run_state(), RunState::Running);
}
