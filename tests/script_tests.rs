//! Integration tests for ScriptPlayer

mod common;
use common::*;

use wopr_codebreak::colors::WHITE;
use wopr_codebreak::script::{
    ALERT_TONE, FLOURISH, MARQUEE, PRESS_BEEP, PRESS_TONE, RELEASE_BEEP, SELF_TEST,
};
use wopr_codebreak::{
    Code, DISPLAY_WIDTH, Script, ScriptError, ScriptPlayer, Segment, ServiceTiming, Step,
    TickDuration, Ticks, TimeSource, Tone,
};

type TestPlayer<'t> = ScriptPlayer<'t, Ticks, MockTimeSource>;

fn play_to_end(
    timer: &MockTimeSource,
    player: &mut TestPlayer<'_>,
    board: &mut TestBoard,
    script: Script,
    code: Code,
) -> usize {
    let first = player.start(script, code, board).unwrap();
    drive(timer, first, 10_000, || player.service(board).unwrap())
}

#[test]
fn service_without_script_fails() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    assert_eq!(player.service(&mut board), Err(ScriptError::NotRunning));
    assert!(!player.is_running());
}

#[test]
fn press_beep_silences_after_its_duration() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    let timing = player.start(PRESS_BEEP, Code::BLANK, &mut board).unwrap();
    assert_eq!(timing, ServiceTiming::Delay(TickDuration(20)));
    assert!(player.is_running());

    timer.advance(TickDuration(20));
    assert_eq!(player.service(&mut board).unwrap(), ServiceTiming::Complete);
    assert_eq!(
        board.buzzer.events,
        vec![BuzzerEvent::Play(PRESS_TONE), BuzzerEvent::Silence]
    );
    assert!(!player.is_running());
}

#[test]
fn release_beep_is_low_chirp() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    play_to_end(&timer, &mut player, &mut board, RELEASE_BEEP, Code::BLANK);

    assert_eq!(board.buzzer.tones(), vec![Tone::new(120, 20, 0.5)]);
}

#[test]
fn early_service_reports_remaining_wait() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    player.start(SELF_TEST, Code::BLANK, &mut board).unwrap();
    timer.advance(TickDuration(20));
    // Chirp done, now holding "WOPR DEMO" for a second
    assert_eq!(
        player.service(&mut board).unwrap(),
        ServiceTiming::Delay(TickDuration(1000))
    );
    let events = board.buzzer.events.len();

    timer.advance(TickDuration(400));
    assert_eq!(
        player.service(&mut board).unwrap(),
        ServiceTiming::Delay(TickDuration(600))
    );
    assert_eq!(board.buzzer.events.len(), events);
}

#[test]
fn flourish_blinks_bound_code() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);
    let code = Code::new("CPE 1704 TKS").unwrap();

    play_to_end(&timer, &mut player, &mut board, FLOURISH, code);

    assert_eq!(board.display.count_shown("CPE 1704 TKS"), 5);
    assert_eq!(board.display.count_shown("LAUNCHING ..."), 5);
    assert_eq!(board.buzzer.tones(), vec![ALERT_TONE; 5]);
    assert_eq!(board.defcon.lit(), vec![0]);
    assert_eq!(board.defcon.leds[0], WHITE);
    // 1 s intro, 5 x (0.5 s dark + 0.5 s tone), 5 x (0.5 s dark + 0.5 s text)
    assert_eq!(timer.now(), Ticks(11_000));
}

#[test]
fn self_test_plays_scale_then_text() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    play_to_end(&timer, &mut player, &mut board, SELF_TEST, Code::BLANK);

    let frequencies: Vec<u32> = board.buzzer.tones().iter().map(|tone| tone.frequency_hz).collect();
    assert_eq!(frequencies, vec![880, 262, 294, 330, 349, 392, 440, 494, 523]);

    let shown = board.display.shown();
    assert_eq!(shown.first(), Some(&"WOPR DEMO"));
    assert_eq!(shown.last(), Some(&"DEMO OVER"));
    assert!(shown.contains(&"TOO LONG MY MAN"));
}

#[test]
fn self_test_shows_padded_and_raw_samples() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    play_to_end(&timer, &mut player, &mut board, SELF_TEST, Code::BLANK);

    let shown = board.display.shown();
    let padded = shown.iter().position(|&text| text == "WOPR        ").unwrap();
    assert_eq!(shown[padded + 1], "WOPR");
    assert_eq!(shown[padded + 2], "TOO LONG MY ");
    assert_eq!(shown[padded + 3], "TOO LONG MY MAN");
    assert_eq!(board.buzzer.count_frequency(880), 1);
}

#[test]
fn marquee_scrolls_one_column_per_frame() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    let timing = player.start(MARQUEE, Code::BLANK, &mut board).unwrap();
    assert_eq!(timing, ServiceTiming::Delay(TickDuration(250)));
    drive(&timer, timing, 1_000, || player.service(&mut board).unwrap());

    let shown = board.display.shown();
    assert!(shown.iter().all(|window| window.len() == DISPLAY_WIDTH));
    assert_eq!(shown.first(), Some(&"            "));
    assert_eq!(shown[1], "           D");
    assert!(shown.contains(&"DON'T FORGET"));
    assert_eq!(shown.last(), Some(&"            "));
    assert_eq!(shown.len(), 59 - DISPLAY_WIDTH + 1);
}

#[test]
fn repeated_segments_replay_every_step() {
    const STEPS: [Step; 2] = [Step::Show("TICK"), Step::Pause(100)];
    const SCRIPT: Script = &[Segment::new(&STEPS, 3)];

    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    let calls = play_to_end(&timer, &mut player, &mut board, SCRIPT, Code::BLANK);

    assert_eq!(board.display.count_shown("TICK"), 3);
    assert_eq!(calls, 3);
}

#[test]
fn zero_repeat_segment_is_skipped() {
    const SKIPPED: [Step; 1] = [Step::Show("NEVER")];
    const SHOWN: [Step; 1] = [Step::Show("ONCE")];
    const SCRIPT: Script = &[Segment::new(&SKIPPED, 0), Segment::once(&SHOWN)];

    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    let timing = player.start(SCRIPT, Code::BLANK, &mut board).unwrap();

    assert_eq!(timing, ServiceTiming::Complete);
    assert_eq!(board.display.shown(), vec!["ONCE"]);
}

#[test]
fn stop_silences_running_script() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    player.start(FLOURISH, Code::BLANK, &mut board).unwrap();
    player.stop(&mut board.buzzer);

    assert!(!player.is_running());
    assert_eq!(board.buzzer.events.last(), Some(&BuzzerEvent::Silence));
    assert_eq!(player.service(&mut board), Err(ScriptError::NotRunning));
}

#[test]
fn restart_replaces_running_script() {
    let timer = MockTimeSource::new();
    let mut board = test_board(ScriptedButtons::new());
    let mut player: TestPlayer = ScriptPlayer::new(&timer);

    player.start(SELF_TEST, Code::BLANK, &mut board).unwrap();
    play_to_end(&timer, &mut player, &mut board, PRESS_BEEP, Code::BLANK);

    assert_eq!(board.display.shown(), vec!["WOPR DEMO"]);
    assert_eq!(board.buzzer.count_frequency(880), 2);
}
