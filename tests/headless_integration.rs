use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use typemeter::app::{Action, App, AppState};
use typemeter::clock::ManualClock;
use typemeter::config::Config;
use typemeter::runtime::{FixedTicker, Runner, TestEventSource, TypeEvent};
use typemeter::sample::FixedSample;

fn key(c: char) -> TypeEvent {
    TypeEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn app(prompt: &str, clock: &ManualClock) -> App<ManualClock> {
    App::new(
        &Config::default(),
        Box::new(FixedSample(prompt.to_string())),
        clock.clone(),
    )
}

// Headless run through Runner/TestEventSource without a TTY
#[test]
fn headless_typing_flow_completes() {
    let clock = ManualClock::new(0);
    let mut app = app("hi", &clock);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(5));

    tx.send(key('h')).unwrap();
    tx.send(key('i')).unwrap();

    for _ in 0..100u32 {
        match runner.step() {
            TypeEvent::Tick => {
                clock.advance(300);
                app.on_tick();
            }
            TypeEvent::Resize => {}
            TypeEvent::Key(k) => {
                app.on_key(k);
                if app.session().is_finished() {
                    break;
                }
            }
        }
    }

    assert!(app.session().is_finished(), "session should have finished");
    assert_eq!(app.state, AppState::Results);
    assert_eq!(app.session().accuracy(), 100);
    assert_eq!(app.session().wrong_percent(), 0);
}

#[test]
fn ticks_keep_wpm_moving_while_paused() {
    let clock = ManualClock::new(0);
    let mut app = app("hello world", &clock);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(1));

    for c in "hello".chars() {
        tx.send(key(c)).unwrap();
    }

    let mut readings = vec![];
    for _ in 0..200u32 {
        match runner.step() {
            TypeEvent::Tick => {
                clock.advance(300);
                app.on_tick();
                if app.session().typed() == "hello" {
                    readings.push(app.session().wpm());
                }
            }
            TypeEvent::Key(k) => {
                app.on_key(k);
            }
            TypeEvent::Resize => {}
        }
        if readings.len() >= 20 {
            break;
        }
    }

    assert!(readings.len() >= 20);
    assert!(readings.windows(2).all(|w| w[1] <= w[0]));
    assert!(readings.last() < readings.first());
    assert_eq!(app.session().typed(), "hello");
}

#[test]
fn ticks_after_finish_change_nothing() {
    let clock = ManualClock::new(0);
    let mut app = app("ok", &clock);

    app.on_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE));
    clock.advance(1_200);
    app.on_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE));
    let done = app.session().clone();

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    for _ in 0..5 {
        if let TypeEvent::Tick = runner.step() {
            clock.advance(10_000);
            app.on_tick();
        }
    }

    assert_eq!(app.session(), &done);
}

#[test]
fn new_test_after_results_starts_clean() {
    let clock = ManualClock::new(0);
    let mut app = app("go", &clock);

    for c in "go".chars() {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    assert_eq!(app.state, AppState::Results);

    assert_eq!(
        app.on_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE)),
        Action::Continue
    );
    assert_eq!(app.state, AppState::Typing);
    assert_eq!(app.session().target(), "go");
    assert!(!app.session().has_started());
    assert_eq!(app.session().wpm(), 0);
    assert_eq!(app.session().accuracy(), 100);
}
