//! Property tests over every supported board and arbitrary wagers

use proptest::prelude::*;

use plinko_core::consts::SIM_DT;
use plinko_core::sim::{
    GameEvent, GameSession, RiskTier, base_payouts, build_layout, supported_rows, total_pegs,
};
use plinko_core::{BoardSettings, PlinkoError, Settings};

fn arb_board() -> impl Strategy<Value = (RiskTier, u32)> {
    prop_oneof![Just(RiskTier::Low), Just(RiskTier::Medium), Just(RiskTier::High)].prop_flat_map(
        |risk| {
            let rows = supported_rows(risk).to_vec();
            (Just(risk), proptest::sample::select(rows))
        },
    )
}

fn session_with(risk: RiskTier, rows: u32, balance: f64, bet: f64, seed: u64) -> GameSession {
    let mut settings = Settings {
        seed: Some(seed),
        ..Default::default()
    };
    settings.wager.risk = risk;
    settings.wager.rows = rows;
    settings.wager.starting_balance = balance;
    settings.wager.bet_amount = bet;
    GameSession::create(settings).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Zone multipliers read the same both ways and number 2n - 1
    #[test]
    fn prop_zones_are_palindromic((risk, rows) in arb_board()) {
        let layout = build_layout(risk, rows, &BoardSettings::default()).unwrap();
        let base = base_payouts(risk, rows);
        prop_assert_eq!(layout.zones.len(), 2 * base.len() - 1);
        let n = layout.zones.len();
        for i in 0..n {
            prop_assert_eq!(layout.zones[i].multiplier, layout.zones[n - 1 - i].multiplier);
            prop_assert_eq!(layout.zones[i].index, i);
        }
        prop_assert_eq!(layout.zones[n / 2].multiplier, base[0].multiplier);
    }

    /// Row r holds r + 3 pegs
    #[test]
    fn prop_lattice_widens_by_one((risk, rows) in arb_board()) {
        let layout = build_layout(risk, rows, &BoardSettings::default()).unwrap();
        for row in 0..rows {
            prop_assert_eq!(layout.pegs_in_row(row), row as usize + 3);
        }
        prop_assert_eq!(layout.pegs.len(), total_pegs(rows));
    }

    /// Unsupported row counts never produce geometry
    #[test]
    fn prop_unsupported_rows_rejected(risk in prop_oneof![Just(RiskTier::Low), Just(RiskTier::High)], rows in 0u32..40) {
        prop_assume!(!supported_rows(risk).contains(&rows));
        prop_assert_eq!(
            build_layout(risk, rows, &BoardSettings::default()),
            Err(PlinkoError::UnsupportedConfiguration { risk, rows })
        );
    }

    /// One drop, one resolution through a real zone contact, exact balance bookkeeping
    #[test]
    fn prop_drop_settles_once(
        (risk, rows) in arb_board(),
        bet in 1u32..20,
        seed in any::<u64>(),
    ) {
        let bet = bet as f64;
        let mut session = session_with(risk, rows, 100.0, bet, seed);
        let before = session.current_state().balance;
        session.drop_ball().unwrap();

        let mut outcome = None;
        for _ in 0..(session.settings().physics.tick_budget + 10) {
            if let Some(o) = session.step(SIM_DT) {
                prop_assert!(outcome.is_none(), "resolved twice");
                outcome = Some(o);
            }
        }
        let outcome = outcome.expect("drop must resolve within its tick budget");
        prop_assert!(!outcome.forced, "default tuning stalled: {:?}", outcome);
        let after = session.current_state();
        prop_assert_eq!(after.balance, before - bet + bet * outcome.multiplier);
        prop_assert!(!after.is_running);

        let resolved = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Resolved(_)))
            .count();
        prop_assert_eq!(resolved, 1);
    }

    /// Drops the balance cannot cover change nothing
    #[test]
    fn prop_uncovered_bet_rejected(balance in 0u32..50, extra in 1u32..50) {
        let balance = balance as f64;
        let bet = balance + extra as f64;
        let mut session = session_with(RiskTier::Low, 8, balance, bet, 1);
        prop_assert_eq!(
            session.drop_ball(),
            Err(PlinkoError::InsufficientBalance { balance, bet })
        );
        prop_assert_eq!(session.current_state().balance, balance);
        prop_assert!(!session.current_state().is_running);
        prop_assert!(session.world().balls().is_empty());
    }

    /// Configuring the same board twice yields the same geometry
    #[test]
    fn prop_configure_idempotent((risk, rows) in arb_board()) {
        let mut session = session_with(RiskTier::Low, 8, 100.0, 1.0, 3);
        session.configure(risk, rows).unwrap();
        let first = session.layout().clone();
        session.configure(risk, rows).unwrap();
        prop_assert_eq!(session.layout(), &first);
    }
}

#[test]
fn scenario_centre_drop_lands_on_every_board() {
    for risk in RiskTier::ALL {
        for &rows in supported_rows(risk) {
            let mut session = session_with(risk, rows, 100.0, 1.0, 99);
            let x = session.layout().spawn_point.x;
            session.drop_ball_at(x).unwrap();
            let mut outcome = None;
            for _ in 0..session.settings().physics.tick_budget {
                if let Some(o) = session.step(SIM_DT) {
                    outcome = Some(o);
                    break;
                }
            }
            let outcome = outcome.unwrap_or_else(|| panic!("{risk}/{rows} never resolved"));
            assert!(!outcome.forced, "{risk}/{rows}: {outcome:?}");
        }
    }
}

#[test]
fn scenario_low_eight_pays_two() {
    // Ball parked over a 2x zone: the tick budget settles it there
    let mut settings = Settings {
        seed: Some(1),
        ..Default::default()
    };
    settings.physics.gravity = 0.0;
    settings.physics.spawn_speed = 0.0;
    settings.physics.tick_budget = 20;
    let mut session = GameSession::create(settings).unwrap();

    let zone = session.layout().zones[6];
    assert_eq!(zone.multiplier, 2.0);
    session.drop_ball_at(zone.x_center).unwrap();
    let mut outcomes = Vec::new();
    for _ in 0..100 {
        outcomes.extend(session.step(SIM_DT));
    }
    assert_eq!(outcomes.len(), 1);
    let state = session.current_state();
    assert_eq!(state.balance, 101.0);
    assert!(!state.is_running);
}

#[test]
fn scenario_high_sixteen_insufficient() {
    let mut session = session_with(RiskTier::High, 16, 3.0, 5.0, 1);
    assert!(matches!(
        session.drop_ball(),
        Err(PlinkoError::InsufficientBalance { .. })
    ));
    assert_eq!(session.current_state().balance, 3.0);
}

#[test]
fn scenario_rapid_double_drop() {
    let mut session = session_with(RiskTier::Medium, 8, 100.0, 1.0, 1);
    session.drop_ball().unwrap();
    assert_eq!(session.drop_ball(), Err(PlinkoError::AlreadyRunning));
    assert_eq!(session.current_state().balance, 99.0);
}

#[test]
fn scenario_forced_resolution_nearest_zone() {
    let mut settings = Settings {
        seed: Some(2),
        ..Default::default()
    };
    settings.physics.gravity = 0.0;
    settings.physics.spawn_speed = 0.0;
    settings.physics.tick_budget = 40;
    let mut session = GameSession::create(settings).unwrap();

    let zones = session.layout().zones.clone();
    // Between zones 1 and 2, closer to 1
    let x = zones[1].x_center + zones[1].width * 0.3;
    session.drop_ball_at(x).unwrap();
    let mut outcomes = Vec::new();
    for _ in 0..200 {
        outcomes.extend(session.step(SIM_DT));
    }
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].forced);
    assert_eq!(outcomes[0].zone_index, 1);
    assert_eq!(session.stats().stalled, 1);
    let resolved = session
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Resolved(_)))
        .count();
    assert_eq!(resolved, 1);
}
