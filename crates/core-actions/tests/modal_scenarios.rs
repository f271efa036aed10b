mod common;

use common::{RecordingFiles, Stroke, numbered_lines, press, session, type_str};
use core_actions::{CloseDecision, FsFileActions};
use core_model::{Document, TextSurface};
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn count_insert_escape_then_save_and_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.txt");
    std::fs::write(&path, format!("{}\n", numbered_lines(20))).unwrap();

    let mut s = session();
    s.open_path(&path).unwrap();
    s.open(Document::with_text("second", "other"));
    s.activate(0);
    let mut files = FsFileActions::new();

    assert_eq!(s.vim().mode(0), Mode::Normal);
    type_str(&mut s, "12j", &mut files);
    assert_eq!(s.active_document().cursor(), Position::new(12, 0));
    assert_eq!(s.vim().current_command(0), "");

    press(&mut s, Stroke::Char('i'), &mut files);
    assert_eq!(s.vim().mode(0), Mode::Insert);

    type_str(&mut s, "hello", &mut files);
    assert_eq!(s.vim().mode(0), Mode::Insert);
    assert!(s.active_document().modified);
    assert!(s.active_document().text().contains("helloline12"));

    press(&mut s, Stroke::Esc, &mut files);
    assert_eq!(s.vim().mode(0), Mode::Normal);
    assert_eq!(s.vim().current_command(0), "");

    type_str(&mut s, ":wq", &mut files);
    assert_eq!(s.vim().current_command(0), ":wq");
    let r = press(&mut s, Stroke::Enter, &mut files);
    assert!(r.consumed);

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("helloline12\n"));
    assert!(on_disk.ends_with("line19\n"));
    assert_eq!(s.len(), 1);
    assert_eq!(s.vim().len(), 1);
    assert_eq!(s.active_index(), 0);
    assert_eq!(s.active_document().name, "second");
}

#[test]
fn append_type_escape_caret_returns_to_line_start() {
    let mut s = session();
    s.open(Document::with_text("t", "first\nsecond\nthird"));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);

    type_str(&mut s, "jA", &mut files);
    assert_eq!(s.vim().mode(0), Mode::Insert);
    assert_eq!(s.vim().current_command(0), "");
    type_str(&mut s, " line", &mut files);
    press(&mut s, Stroke::Esc, &mut files);
    press(&mut s, Stroke::Char('^'), &mut files);

    assert_eq!(s.active_document().cursor(), Position::new(1, 0));
    assert_eq!(s.active_document().text(), "first\nsecond line\nthird");
}

#[test]
fn insert_after_abandoned_prefix_starts_clean() {
    let mut s = session();
    s.open(Document::with_text("t", "abc"));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);
    type_str(&mut s, "1g", &mut files);
    assert_eq!(s.vim().current_command(0), "1g");
    // `1gi` is not a command; Esc then `i` is the only way in.
    press(&mut s, Stroke::Esc, &mut files);
    press(&mut s, Stroke::Char('i'), &mut files);
    assert_eq!(s.vim().mode(0), Mode::Insert);
    assert_eq!(s.vim().current_command(0), "");
}

#[test]
fn zero_count_is_inert() {
    let mut s = session();
    s.open(Document::with_text("t", &numbered_lines(5)));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);
    type_str(&mut s, "0j", &mut files);
    assert_eq!(s.active_document().cursor(), Position::origin());
    assert_eq!(s.vim().current_command(0), "0j");
}

#[test]
fn gg_and_g_need_the_complete_sequence() {
    let mut s = session();
    s.open(Document::with_text("t", &numbered_lines(5)));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);

    press(&mut s, Stroke::Char('G'), &mut files);
    assert_eq!(s.active_document().cursor(), Position::new(4, 0));

    press(&mut s, Stroke::Char('g'), &mut files);
    assert_eq!(s.active_document().cursor(), Position::new(4, 0));
    assert_eq!(s.vim().current_command(0), "g");

    press(&mut s, Stroke::Char('g'), &mut files);
    assert_eq!(s.active_document().cursor(), Position::origin());
    assert_eq!(s.vim().current_command(0), "");
}

#[test]
fn dollar_then_l_wraps_to_next_line() {
    let mut s = session();
    s.open(Document::with_text("t", "ab\ncd"));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);
    type_str(&mut s, "$", &mut files);
    assert_eq!(s.active_document().cursor(), Position::new(0, 2));
    type_str(&mut s, "l", &mut files);
    assert_eq!(s.active_document().cursor(), Position::new(1, 0));
    type_str(&mut s, "2h", &mut files);
    assert_eq!(s.active_document().cursor(), Position::new(0, 1));
}

#[test]
fn normal_mode_never_edits_text() {
    let mut s = session();
    s.open(Document::with_text("t", "abc"));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);
    type_str(&mut s, "xyz:w!q", &mut files);
    press(&mut s, Stroke::Backspace, &mut files);
    press(&mut s, Stroke::Enter, &mut files);
    assert_eq!(s.active_document().text(), "abc");
    assert!(!s.active_document().modified);
}

#[test]
fn enter_in_insert_mode_inserts_newline() {
    let mut s = session();
    s.open(Document::with_text("t", "ab"));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);
    type_str(&mut s, "li", &mut files);
    let r = press(&mut s, Stroke::Enter, &mut files);
    assert!(!r.consumed);
    assert_eq!(s.active_document().text(), "a\nb");
}

#[test]
fn vim_states_are_per_document() {
    let mut s = session();
    s.open(Document::with_text("a", "x"));
    s.open(Document::with_text("b", "y"));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);

    press(&mut s, Stroke::Char('i'), &mut files);
    assert_eq!(s.vim().mode(1), Mode::Insert);
    s.activate(0);
    type_str(&mut s, "1", &mut files);
    assert_eq!(s.vim().mode(0), Mode::Normal);
    assert_eq!(s.vim().current_command(0), "1");
    assert_eq!(s.vim().current_command(1), "");
    assert_eq!(s.document(0).text(), "x");
}

#[test]
fn huge_count_on_long_line_moves_in_one_pass() {
    let mut s = session();
    s.open(Document::with_text("long", &"x".repeat(20_000)));
    let mut files = RecordingFiles::answering(CloseDecision::Cancel);
    let started = std::time::Instant::now();
    type_str(&mut s, "20000l", &mut files);
    type_str(&mut s, "999999h", &mut files);
    type_str(&mut s, "999999l", &mut files);
    assert_eq!(s.active_document().cursor(), Position::new(0, 20_000));
    assert!(
        started.elapsed() < std::time::Duration::from_secs(2),
        "motions took {:?}",
        started.elapsed()
    );
}
