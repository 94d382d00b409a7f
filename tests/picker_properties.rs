use std::collections::BTreeSet;
use std::time::Duration;

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use wordveil::game::Game;
use wordveil::picker::{Picker, PickerConfig, PickerStep};

fn picker_config() -> impl Strategy<Value = PickerConfig> {
    (1u64..200, 0u64..3_000, 0u64..3_000, 0u64..500).prop_map(
        |(start_cadence_ms, slowdown_after_ms, extra, cadence_step_ms)| PickerConfig {
            start_cadence_ms,
            slowdown_after_ms,
            stop_after_ms: slowdown_after_ms + extra + 1,
            cadence_step_ms,
        },
    )
}

fn hidden_set() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::btree_set(0usize..64, 1..20).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #[test]
    fn picks_stay_in_set_and_run_terminates(
        config in picker_config(),
        hidden in hidden_set(),
        seed in any::<u64>(),
    ) {
        let mut picker = Picker::new(config);
        let mut rng = StdRng::seed_from_u64(seed);
        let allowed: BTreeSet<usize> = hidden.iter().copied().collect();
        let token = picker.start();

        let mut ticks = 0u64;
        let mut last_cadence = picker.cadence();
        let mut elapsed_before_stop = Duration::ZERO;

        loop {
            prop_assert!(picker.cadence() >= last_cadence, "cadence decreased");
            last_cadence = picker.cadence();
            elapsed_before_stop = picker.elapsed();

            let step = picker.tick(token, &hidden, &mut rng);
            ticks += 1;
            prop_assert!(ticks <= config.max_ticks(), "run exceeded its tick bound");

            match step {
                PickerStep::Selected { index, next_in } => {
                    prop_assert!(allowed.contains(&index));
                    prop_assert!(next_in >= last_cadence);
                }
                PickerStep::Stopped { index } => {
                    prop_assert!(allowed.contains(&index));
                    break;
                }
                other => prop_assert!(false, "unexpected step {:?}", other),
            }
        }

        prop_assert!(!picker.is_running());
        // The last tick is scheduled before the budget runs out.
        prop_assert!(elapsed_before_stop < Duration::from_millis(config.stop_after_ms));
        prop_assert!(picker.elapsed() >= Duration::from_millis(config.stop_after_ms));
    }

    #[test]
    fn guess_must_match_exactly(
        words in prop::collection::vec("[A-Za-z]{1,8}", 1..10),
        pick in any::<prop::sample::Index>(),
        guess in "[A-Za-z]{1,8}",
        seed in any::<u64>(),
    ) {
        let mut game = Game::new(&words.join(" "), true, PickerConfig::default());
        let mut rng = StdRng::seed_from_u64(seed);
        let index = pick.index(words.len());

        game.open_answer(index).unwrap();
        game.set_guess(guess.clone()).unwrap();
        game.submit_answer(&mut rng).unwrap();

        let expected = if guess == words[index] {
            wordveil::board::CellState::Revealed
        } else {
            wordveil::board::CellState::Wrong
        };
        prop_assert_eq!(game.board().cell(index), Some(expected));
    }
}
