use crate::clock::Millis;

/// Standard word length used for WPM
pub const CHARS_PER_WORD: f64 = 5.0;

/// Lower bound on elapsed time (one second) so the first keystroke
/// doesn't produce an explosive WPM.
pub const MIN_ELAPSED_MINUTES: f64 = 1.0 / 60.0;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Live readings for a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u8,
    pub wrong_percent: u8,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
            wrong_percent: 0,
        }
    }
}

/// How a single target character currently stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CharState {
    Pending,
    Correct,
    Incorrect,
}

pub fn elapsed_minutes(started_at: Millis, now: Millis) -> f64 {
    let minutes = now.saturating_sub(started_at) as f64 / MS_PER_MINUTE;
    minutes.max(MIN_ELAPSED_MINUTES)
}

pub fn wpm(chars_typed: usize, minutes: f64) -> u32 {
    let raw = (chars_typed as f64 / CHARS_PER_WORD / minutes).round();
    if raw.is_finite() {
        raw.max(0.0) as u32
    } else {
        0
    }
}

/// Positions where `typed` matches `target`. Anything typed past the end
/// of the target never counts.
pub fn correct_chars(typed: &str, target: &str) -> usize {
    typed
        .chars()
        .zip(target.chars())
        .filter(|(t, e)| t == e)
        .count()
}

pub fn accuracy(correct: usize, chars_typed: usize) -> u8 {
    if chars_typed == 0 {
        return 100;
    }
    let pct = (correct as f64 / chars_typed as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

pub fn wrong_percent(accuracy: u8, chars_typed: usize) -> u8 {
    if chars_typed == 0 {
        0
    } else {
        100u8.saturating_sub(accuracy)
    }
}

/// Recompute every reading for `typed` against `target` as of `now`.
/// Returns the rest values when the session hasn't started.
pub fn compute(target: &str, typed: &str, started_at: Option<Millis>, now: Millis) -> Metrics {
    let Some(started_at) = started_at else {
        return Metrics::default();
    };

    let chars_typed = typed.chars().count();
    let minutes = elapsed_minutes(started_at, now);
    let accuracy = accuracy(correct_chars(typed, target), chars_typed);

    Metrics {
        wpm: wpm(chars_typed, minutes),
        accuracy,
        wrong_percent: wrong_percent(accuracy, chars_typed),
    }
}

/// Per-character view of the target used for rendering
pub fn classify(target: &str, typed: &str) -> Vec<CharState> {
    let mut typed = typed.chars();
    target
        .chars()
        .map(|expected| match typed.next() {
            None => CharState::Pending,
            Some(c) if c == expected => CharState::Correct,
            Some(_) => CharState::Incorrect,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_values_before_start() {
        let m = compute("hello", "", None, 10_000);
        assert_eq!(m, Metrics::default());
        assert_eq!(m.wpm, 0);
        assert_eq!(m.accuracy, 100);
        assert_eq!(m.wrong_percent, 0);
    }

    #[test]
    fn test_cat_in_six_seconds() {
        let m = compute("cat", "cat", Some(0), 6_000);
        assert_eq!(m.wpm, 6);
        assert_eq!(m.accuracy, 100);
        assert_eq!(m.wrong_percent, 0);
    }

    #[test]
    fn test_cap_against_cat() {
        assert_eq!(correct_chars("cap", "cat"), 2);
        let m = compute("cat", "cap", Some(0), 123_456);
        assert_eq!(m.accuracy, 67);
        assert_eq!(m.wrong_percent, 33);
    }

    #[test]
    fn test_elapsed_is_clamped_to_one_second() {
        assert_eq!(elapsed_minutes(1_000, 1_000), MIN_ELAPSED_MINUTES);
        assert_eq!(elapsed_minutes(1_000, 1_200), MIN_ELAPSED_MINUTES);
        // clock went backwards
        assert_eq!(elapsed_minutes(5_000, 1_000), MIN_ELAPSED_MINUTES);
        assert_eq!(elapsed_minutes(0, 120_000), 2.0);
    }

    #[test]
    fn test_first_keystroke_wpm_is_bounded() {
        // 1 char in the clamped second: 1 / 5 / (1/60) = 12
        let m = compute("hello", "h", Some(0), 0);
        assert_eq!(m.wpm, 12);
    }

    #[test]
    fn test_wpm_handles_degenerate_minutes() {
        assert_eq!(wpm(10, 0.0), 0);
        assert_eq!(wpm(10, f64::NAN), 0);
        assert_eq!(wpm(0, 1.0), 0);
        assert_eq!(wpm(300, 1.0), 60);
    }

    #[test]
    fn test_over_typed_chars_never_count() {
        assert_eq!(correct_chars("catcat", "cat"), 3);
        let m = compute("cat", "catcat", Some(0), 60_000);
        assert_eq!(m.accuracy, 50);
        assert_eq!(m.wrong_percent, 50);
    }

    #[test]
    fn test_empty_typed_after_start() {
        let m = compute("cat", "", Some(0), 30_000);
        assert_eq!(m.wpm, 0);
        assert_eq!(m.accuracy, 100);
        assert_eq!(m.wrong_percent, 0);
    }

    #[test]
    fn test_accuracy_and_wrong_sum_to_hundred() {
        let target = "the quick brown fox";
        let samples = ["t", "tx", "thx q", "zzzzz", "the quick brown fox!!"];
        for typed in samples {
            let m = compute(target, typed, Some(0), 9_000);
            assert_eq!(
                m.accuracy as u16 + m.wrong_percent as u16,
                100,
                "typed {typed:?}"
            );
        }
    }

    #[test]
    fn test_multibyte_chars_counted_once() {
        assert_eq!(correct_chars("héllo", "héllo"), 5);
        let m = compute("héllo", "héllo", Some(0), 60_000);
        assert_eq!(m.wpm, 1);
        assert_eq!(m.accuracy, 100);
    }

    #[test]
    fn test_extreme_clock_values_stay_in_range() {
        let backwards = compute("hello", "h", Some(1_700_000_000_000), i64::MIN);
        assert_eq!(backwards.wpm, 12);
        assert_eq!(backwards.accuracy, 100);
        assert_eq!(backwards.wrong_percent, 0);

        let forwards = compute("hello", "hx", Some(-1_000), i64::MAX);
        assert_eq!(forwards.wpm, 0);
        assert_eq!(forwards.accuracy, 50);
        assert_eq!(forwards.wrong_percent, 50);
    }

    #[test]
    fn test_classify() {
        use CharState::*;
        assert_eq!(
            classify("hello", "hex"),
            vec![Correct, Correct, Incorrect, Pending, Pending]
        );
        assert_eq!(classify("hi", ""), vec![Pending, Pending]);
        // extra typed chars have no slot
        assert_eq!(classify("hi", "hiya"), vec![Correct, Correct]);
    }

    #[test]
    fn test_classify_agrees_with_correct_count() {
        let target = "Practice daily to improve your typing skills.";
        let typed = "Practise daily to imprve";
        let correct = classify(target, typed)
            .into_iter()
            .filter(|s| *s == CharState::Correct)
            .count();
        assert_eq!(correct, correct_chars(typed, target));
    }

    #[test]
    fn test_char_state_display() {
        assert_eq!(CharState::Pending.to_string(), "pending");
        assert_eq!(CharState::Incorrect.to_string(), "incorrect");
    }

    #[test]
    fn test_wpm_continuous_in_time() {
        let text = "a".repeat(50);
        let mut last = compute(&text, &text, Some(0), 1_000).wpm;
        for now in (1_100..60_000).step_by(100) {
            let cur = compute(&text, &text, Some(0), now).wpm;
            assert!(cur <= last, "wpm should not climb for fixed input");
            // one rounding step of slack plus the slope over 100ms
            assert!(last - cur <= 60, "jump from {last} to {cur} at {now}");
            last = cur;
        }
    }
}
