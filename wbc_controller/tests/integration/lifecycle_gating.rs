//! Integration test: lifecycle gating.
//!
//! Joint states only drive the solver once a goal has started it; start and
//! update failures are logged, counted and recovered from.

use wbc_controller::lifecycle::RunState;

use super::*;

#[test]
fn joint_states_before_a_goal_only_update_state() {
    let (mut control, script) = scripted_loop();

    control.on_joint_state(&joint_state(&[(LEFT, 0.3), (RIGHT, -0.3)]));

    assert_eq!(control.state().joints(), &[0.3, -0.3]);
    assert_eq!(control.run_state(), RunState::Stopped);
    assert_eq!(control.sink().counts().commands, 0);
    assert_eq!(control.sink().counts().feedback, 0);
    assert_eq!(script.updates.get(), 0);
    assert_eq!(control.stats().joint_state_messages, 1);
}

#[test]
fn first_accepted_goal_starts_from_current_state() {
    let (mut control, script) = scripted_loop();
    control.on_joint_state(&joint_state(&[(LEFT, 0.3), (RIGHT, -0.3)]));

    control.on_goal(&goal(1.0, 1.0));

    assert_eq!(control.run_state(), RunState::Running);
    assert_eq!(script.starts.get(), 1);
    // Start never publishes commands.
    assert_eq!(control.sink().counts().commands, 0);
}

#[test]
fn failed_start_stays_stopped_until_next_accepted_goal() {
    let (mut control, script) = scripted_loop();
    script.fail_start.set(true);

    control.on_goal(&goal(1.0, 1.0));
    assert_eq!(control.run_state(), RunState::Stopped);
    assert_eq!(script.starts.get(), 1);

    // Joint states keep flowing but nothing is solved.
    control.on_joint_state(&joint_state(&[(LEFT, 0.1)]));
    assert_eq!(control.sink().counts().commands, 0);

    // Duplicate goals don't retry.
    control.on_goal(&goal(1.0, 1.0));
    assert_eq!(script.starts.get(), 1);

    script.fail_start.set(false);
    control.on_goal(&goal(1.5, 1.0));
    assert_eq!(control.run_state(), RunState::Running);
    assert_eq!(script.starts.get(), 2);
    assert_eq!(control.stats().start_attempts, 2);
}

#[test]
fn running_tick_publishes_every_channel_then_feedback() {
    let (mut control, script) = scripted_loop();
    control.on_goal(&goal(1.0, 1.0));

    control.on_joint_state(&joint_state(&[(LEFT, 0.25), (RIGHT, 0.75)]));

    let bus = control.sink();
    assert_eq!(script.updates.get(), 1);
    assert_eq!(bus.counts().commands, 2);
    assert_eq!(bus.counts().feedback, 1);
    assert_eq!(bus.command(LEFT_CHANNEL), Some(0.25));
    assert_eq!(bus.command(RIGHT_CHANNEL), Some(0.75));

    let feedback = bus.feedback().expect("feedback published");
    assert_eq!(feedback.commands[0].semantics, LEFT);
    assert_eq!(feedback.commands[1].value, 0.75);
    assert_eq!(feedback.slacks[0].semantics, "posture");
    assert_eq!(feedback.slacks[0].value, 1.0);
}

#[test]
fn failed_update_skips_the_tick() {
    let (mut control, script) = scripted_loop();
    control.on_goal(&goal(1.0, 1.0));
    control.on_joint_state(&joint_state(&[(LEFT, 0.25)]));
    assert_eq!(control.sink().counts().commands, 2);

    script.fail_update.set(true);
    control.on_joint_state(&joint_state(&[(LEFT, 0.5)]));

    // Nothing new published; previous values stay latched.
    assert_eq!(control.sink().counts().commands, 2);
    assert_eq!(control.sink().command(LEFT_CHANNEL), Some(0.25));
    assert_eq!(control.stats().failed_updates, 1);
    assert_eq!(control.run_state(), RunState::Running);

    // The next message recovers.
    script.fail_update.set(false);
    control.on_joint_state(&joint_state(&[(LEFT, 0.5)]));
    assert_eq!(control.sink().command(LEFT_CHANNEL), Some(0.5));
    assert_eq!(control.stats().ticks, 2);
}

#[test]
fn every_running_joint_state_triggers_exactly_one_tick() {
    let (mut control, script) = scripted_loop();
    control.on_goal(&goal(1.0, 1.0));

    for i in 0..5 {
        control.on_joint_state(&joint_state(&[(LEFT, f64::from(i))]));
    }

    assert_eq!(script.updates.get(), 5);
    assert_eq!(control.stats().ticks, 5);
    assert_eq!(control.sink().counts().commands, 10);
    assert_eq!(control.sink().counts().feedback, 5);
}

#[test]
fn extra_controllables_have_no_channel() {
    let (solver, _script) = ScriptedSolver::new(&[LEFT, RIGHT, "torso_lift_joint"]);
    let mut control = ControlLoop::new(&config(), solver, LatchedBus::new()).expect("loop");
    control.on_goal(&goal(1.0, 1.0));
    control.on_joint_state(&joint_state(&[(LEFT, 0.1)]));

    let bus = control.sink();
    assert_eq!(bus.command_channels(), [LEFT_CHANNEL, RIGHT_CHANNEL]);
    // Feedback still reports every controllable.
    assert_eq!(bus.feedback().map(|f| f.commands.len()), Some(3));
}
