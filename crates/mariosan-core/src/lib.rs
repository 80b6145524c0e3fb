pub mod game_trait;
pub mod geom;
pub mod input;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{FrameResult, Phase, Simulation};
    use crate::input::{Action, InputSnapshot};

    /// Fixed step used by the contract tests (60 Hz).
    pub const TEST_DT: f32 = 1.0 / 60.0;

    /// Input with only `MoveRight` held.
    pub fn hold_right() -> InputSnapshot {
        InputSnapshot::held(&[Action::MoveRight])
    }

    /// Run N ticks with the same input, returning every frame result.
    pub fn run_ticks<S: Simulation>(
        sim: &mut S,
        n: usize,
        dt: f32,
        input: &InputSnapshot,
    ) -> Vec<FrameResult<S::Event>> {
        (0..n).map(|_| sim.tick(dt, input)).collect()
    }

    /// Tick with `input` until the phase leaves `Playing` or `max_ticks`
    /// elapse. Returns the final phase.
    pub fn run_until_terminal<S: Simulation>(
        sim: &mut S,
        max_ticks: usize,
        dt: f32,
        input: &InputSnapshot,
    ) -> Phase {
        for _ in 0..max_ticks {
            let result = sim.tick(dt, input);
            if result.phase.is_terminal() {
                return result.phase;
            }
        }
        sim.phase()
    }

    /// Assert that the serialized snapshot differs from `before`.
    pub fn assert_snapshot_changed<S: Simulation>(sim: &S, before: &[u8]) {
        let after = sim.serialize_snapshot();
        assert_ne!(
            before,
            &after[..],
            "Snapshot should have changed after operation"
        );
    }

    // ================================================================
    // Simulation Contract Tests
    // ================================================================
    // Every Simulation implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// Ticking with dt>0 must change the snapshot (at least the clock).
    pub fn contract_tick_advances_state<S: Simulation>(sim: &mut S) {
        let before = sim.serialize_snapshot();
        sim.tick(TEST_DT, &hold_right());
        assert_snapshot_changed(sim, &before);
    }

    /// restart() twice in a row from any state must yield identical
    /// snapshots in the `Playing` phase.
    pub fn contract_restart_is_idempotent<S: Simulation>(sim: &mut S) {
        run_ticks(sim, 30, TEST_DT, &hold_right());
        sim.restart();
        let first = sim.serialize_snapshot();
        assert_eq!(sim.phase(), Phase::Playing, "restart must resume play");
        sim.restart();
        let second = sim.serialize_snapshot();
        assert_eq!(first, second, "Two restarts must produce identical state");
    }

    /// Once terminal, tick() must be a no-op until restart/advance.
    pub fn contract_terminal_phase_freezes<S: Simulation>(sim: &mut S) {
        assert!(sim.is_terminal(), "contract requires a finished level");
        let phase = sim.phase();
        let before = sim.serialize_snapshot();
        let results = run_ticks(sim, 10, TEST_DT, &hold_right().with_jump_pressed());
        assert!(results.iter().all(|r| r.phase == phase));
        assert_eq!(
            before,
            sim.serialize_snapshot(),
            "State must not change after the level ended"
        );
    }

    /// advance_level() while not won must be rejected without side effects.
    pub fn contract_advance_requires_win<S: Simulation>(sim: &mut S) {
        assert_ne!(sim.phase(), Phase::Won, "contract requires an unwon level");
        let before = sim.serialize_snapshot();
        assert!(!sim.advance_level(), "advance must be refused");
        assert_eq!(before, sim.serialize_snapshot());
    }

    /// Zero or degenerate dt must not move anything.
    pub fn contract_zero_dt_is_inert<S: Simulation>(sim: &mut S) {
        let before = sim.serialize_snapshot();
        sim.tick(0.0, &InputSnapshot::default());
        sim.tick(f32::NAN, &InputSnapshot::default());
        assert_eq!(before, sim.serialize_snapshot());
    }
}
