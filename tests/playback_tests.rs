//! Playback integration tests — typewriter and advance controller together,
//! driven with explicit instants so nothing sleeps.

use std::time::{Duration, Instant};

use scene_player::playback::typewriter::Typewriter;
use scene_player::playback::{Advance, Playback};
use scene_player::script::{AnyCharacter, Cast, ScriptError};
use scene_player::types::{Position, SceneScript, Screen};

const TICK: Duration = Duration::from_millis(25);

/// Tick until the current line is fully revealed, returning the last instant.
fn finish_line(p: &mut Playback, mut now: Instant) -> Instant {
    while let Some(due) = p.next_deadline() {
        p.tick(due);
        now = due;
    }
    now
}

fn script(shape: &[usize]) -> SceneScript {
    let screens = shape
        .iter()
        .enumerate()
        .map(|(s, &lines)| Screen {
            background: format!("bg{s}").as_str().into(),
            character: None,
            text: (0..lines).map(|l| format!("screen {s} line {l}")).collect(),
            fragments: Vec::new(),
        })
        .collect();
    SceneScript::new(screens)
}

#[test]
fn two_screen_scenario() {
    let t0 = Instant::now();
    let script = SceneScript::new(vec![
        Screen::new("bg1", &["A", "B"]),
        Screen::new("bg2", &["C"]),
    ]);
    let mut p = Playback::new(script, TICK, t0).unwrap();
    assert_eq!(p.position(), Position { screen: 0, line: 0 });

    let mut now = finish_line(&mut p, t0);
    assert_eq!(p.advance(now), Advance::NextLine);
    assert_eq!(p.position(), Position { screen: 0, line: 1 });

    now = finish_line(&mut p, now);
    assert_eq!(p.advance(now), Advance::NextScreen);
    assert_eq!(p.position(), Position { screen: 1, line: 0 });

    now = finish_line(&mut p, now);
    assert_eq!(p.advance(now), Advance::EndOfScript);
    assert!(p.end_of_script_reached());

    assert_eq!(p.advance(now), Advance::Ignored);
    assert_eq!(p.position(), Position { screen: 1, line: 0 });
    assert!(p.end_of_script_reached());
}

#[test]
fn transition_count_matches_line_count() {
    let shapes: [&[usize]; 4] = [&[1], &[3], &[1, 1, 1], &[2, 5, 1, 3]];
    for shape in shapes {
        let script = script(shape);
        let expected = script.line_count() - 1;
        let mut now = Instant::now();
        let mut p = Playback::new(script, TICK, now).unwrap();

        let mut transitions = 0;
        loop {
            now = finish_line(&mut p, now);
            match p.advance(now) {
                Advance::NextLine | Advance::NextScreen => transitions += 1,
                Advance::EndOfScript => break,
                other => panic!("unexpected {other:?} after full reveal"),
            }
        }
        assert_eq!(transitions, expected, "shape {shape:?}");
        assert!(p.at_final_line());
    }
}

#[test]
fn advance_while_typing_never_moves() {
    let mut now = Instant::now();
    let mut p = Playback::new(script(&[2, 2]), TICK, now).unwrap();
    for _ in 0..3 {
        now += TICK;
        p.tick(now);
        let before = p.position();
        if p.is_typing() {
            assert_eq!(p.advance(now), Advance::Skipped);
            assert_eq!(p.position(), before);
            assert_eq!(p.revealed(), p.current_line());
        }
    }
}

#[test]
fn rapid_input_never_mixes_lines() {
    let mut now = Instant::now();
    let mut p = Playback::new(script(&[3, 2, 4]), TICK, now).unwrap();

    // Alternate a couple of ticks with an advance, as a user mashing Enter would.
    while !p.end_of_script_reached() {
        for _ in 0..2 {
            now += TICK;
            p.tick(now);
            let line = p.current_line().to_string();
            assert!(line.starts_with(p.revealed()), "{:?} vs {line:?}", p.revealed());
        }
        p.advance(now);
        let Position { screen, line } = p.position();
        assert_eq!(p.current_line(), format!("screen {screen} line {line}"));
        assert!(
            p.current_line().starts_with(p.revealed()),
            "stale prefix {:?} on {:?}",
            p.revealed(),
            p.current_line()
        );
    }
}

#[test]
fn skip_stops_further_ticks() {
    let t0 = Instant::now();
    let mut tw = Typewriter::new();
    tw.start("The voice fractures.", TICK, t0);
    tw.tick(t0 + TICK);
    tw.skip();
    assert_eq!(tw.revealed(), "The voice fractures.");
    assert!(!tw.is_typing());
    assert_eq!(tw.next_deadline(), None);
    assert!(!tw.tick(t0 + Duration::from_secs(60)));
}

#[test]
fn sample_script_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scripts/chapter1.json");
    let script = SceneScript::load(path).unwrap();
    script.validate(&AnyCharacter).unwrap();
    script.validate(&Cast::new(["kai", "airi"])).unwrap();
    assert!(matches!(
        script.validate(&Cast::new(["kai"])),
        Err(ScriptError::UnknownCharacter { screen: 2, .. })
    ));
    assert_eq!(script.line_count(), 7);
    assert_eq!(script.ending.next.as_deref(), Some("chapter2.json"));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        SceneScript::load("does/not/exist.json"),
        Err(ScriptError::Io(_))
    ));
}
