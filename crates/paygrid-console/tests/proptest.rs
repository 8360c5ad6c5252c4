use paygrid_console::{mask, IdleConfig, IdleEvent, IdleTimer};
use proptest::prelude::*;

proptest! {
    #[test]
    fn mask_keeps_only_last_four(value in "\\PC{0,40}") {
        let masked = mask(Some(&value));
        let chars: Vec<char> = value.chars().collect();
        if chars.len() <= 4 {
            prop_assert_eq!(masked, "****");
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            prop_assert!(masked.ends_with(&tail));
            let stars = masked.chars().count() - 4;
            prop_assert_eq!(stars, (chars.len() - 4).max(4));
            prop_assert!(masked.chars().take(stars).all(|c| c == '*'));
        }
    }

    #[test]
    fn timeout_fires_exactly_once_at_deadline(
        timeout in 2_000u64..3_600_000,
        warning in 0u64..120_000,
        mut polls in proptest::collection::vec(0i64..7_200_000, 1..40),
    ) {
        let config = IdleConfig { timeout_ms: timeout, warning_ms: warning, disabled: false };
        let mut timer = IdleTimer::new(config, 0);
        polls.sort_unstable();

        let mut timeouts = 0;
        for now in polls {
            match timer.poll(now) {
                Some(IdleEvent::Timeout) => {
                    prop_assert!(now >= timeout as i64);
                    timeouts += 1;
                }
                Some(IdleEvent::Warn) => prop_assert!(now < timeout as i64),
                None => {}
            }
        }
        prop_assert!(timeouts <= 1);
    }
}
