// tests/dashboard_render.rs

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use tiledash::engine::{Coordinator, JobUpdate, NullSink};
use tiledash::exec::ExecOutcome;
use tiledash::ui::render::{draw_page, tail_lines};
use tiledash::job::{JobStatus, SlotKey};
use tiledash::ui::{Dashboard, KeyAction, Page, PageUpdate, Pager, action_for_key, restore_terminal};
use tiledash_test_utils::builders::{one_shot, repeating};
use tiledash_test_utils::fake_executor::FakeExecutor;
use tiledash_test_utils::init_tracing;

fn render(page: &Page, pager: &Pager) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| draw_page(frame, page, pager)).unwrap();

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test(start_paused = true)]
async fn page_shows_titles_status_and_output() {
    init_tracing();

    let exec = FakeExecutor::new().with_outcome(
        "exit 2",
        ExecOutcome::failure("went wrong\n", "exit status 2"),
    );
    let coord = Coordinator::new(
        vec![
            repeating("clock", "date", 60),
            one_shot("who", "whoami"),
            one_shot("broken", "exit 2"),
        ],
        Arc::new(exec),
        Arc::new(NullSink),
    );

    let page = Page::from_coordinator("jobs.toml", &coord);
    let handle = coord.start(&CancellationToken::new());
    tokio::time::sleep(Duration::from_secs(1)).await;

    let screen = render(&page, &Pager::new(2));

    assert!(screen.contains("Page 1/2: jobs.toml"), "{screen}");
    assert!(screen.contains("Repeating: clock"), "{screen}");
    assert!(screen.contains("Non-Repeating: who"), "{screen}");
    assert!(screen.contains("Non-Repeating: broken"), "{screen}");
    assert!(screen.contains("Command: whoami"), "{screen}");
    assert!(screen.contains("Status: Completed"), "{screen}");
    assert!(screen.contains("Status: Failed: exit status 2"), "{screen}");
    assert!(screen.contains("ran whoami"), "{screen}");
    assert!(screen.contains("went wrong"), "{screen}");
    assert!(screen.contains("Next run in "), "{screen}");

    handle.shutdown().await;
}

#[test]
fn pending_jobs_render_before_any_run() {
    let coord = Coordinator::new(
        vec![one_shot("later", "sleep 1")],
        Arc::new(FakeExecutor::new()),
        Arc::new(NullSink),
    );
    let page = Page::from_coordinator("pending.yaml", &coord);
    let screen = render(&page, &Pager::new(1));

    assert!(screen.contains("Page 1/1: pending.yaml"), "{screen}");
    assert!(screen.contains("Status: Pending"), "{screen}");
    assert!(!screen.contains("Next run in"), "{screen}");
}

#[test]
fn empty_page_says_so() {
    let page = Page::new("empty", Vec::new());
    let screen = render(&page, &Pager::new(1));
    assert!(screen.contains("no jobs"), "{screen}");
}

#[test]
fn tail_lines_keeps_the_end() {
    assert_eq!(tail_lines("a\nb\nc\n", 2), vec!["b", "c"]);
    assert_eq!(tail_lines("a\nb", 5), vec!["a", "b"]);
    assert!(tail_lines("a\nb", 0).is_empty());
    assert!(tail_lines("", 3).is_empty());
}

#[test]
fn pager_wraps_both_ways() {
    let mut pager = Pager::new(3);
    assert_eq!(pager.prev(), 2);
    assert_eq!(pager.next(), 0);
    assert_eq!(pager.next(), 1);

    let mut single = Pager::new(0);
    assert_eq!(single.total(), 1);
    assert_eq!(single.next(), 0);
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
}

#[test]
fn keys_map_to_actions() {
    let none = KeyModifiers::NONE;
    assert_eq!(action_for_key(press(KeyCode::Char('q'), none)), Some(KeyAction::Quit));
    assert_eq!(action_for_key(press(KeyCode::Esc, none)), Some(KeyAction::Quit));
    assert_eq!(
        action_for_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(KeyAction::Quit)
    );
    assert_eq!(action_for_key(press(KeyCode::Char('c'), none)), None);
    assert_eq!(action_for_key(press(KeyCode::Char('n'), none)), Some(KeyAction::NextPage));
    assert_eq!(action_for_key(press(KeyCode::Right, none)), Some(KeyAction::NextPage));
    assert_eq!(action_for_key(press(KeyCode::Char('p'), none)), Some(KeyAction::PrevPage));
    assert_eq!(action_for_key(press(KeyCode::Left, none)), Some(KeyAction::PrevPage));

    let release = KeyEvent::new_with_kind(KeyCode::Char('q'), none, KeyEventKind::Release);
    assert_eq!(action_for_key(release), None);
}

#[test]
fn dashboard_actions_move_between_pages() {
    let (_tx, rx) = mpsc::unbounded_channel();
    let pages = vec![Page::new("a", Vec::new()), Page::new("b", Vec::new())];
    let mut dashboard = Dashboard::new(pages, rx, CancellationToken::new());

    assert!(!dashboard.apply(KeyAction::NextPage));
    assert_eq!(dashboard.pager().current(), 1);
    assert!(!dashboard.apply(KeyAction::NextPage));
    assert_eq!(dashboard.pager().current(), 0);
    assert!(!dashboard.apply(KeyAction::PrevPage));
    assert_eq!(dashboard.pager().current(), 1);
    assert!(dashboard.apply(KeyAction::Quit));
}

#[test]
fn pending_updates_mark_the_screen_stale() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut dashboard = Dashboard::new(vec![Page::new("a", Vec::new())], rx, CancellationToken::new());
    assert_eq!(dashboard.drain_updates(), 0);

    for status in [JobStatus::Running, JobStatus::Completed] {
        tx.send(PageUpdate {
            page: 0,
            update: JobUpdate {
                key: SlotKey::new(0, 0),
                name: "job".to_string(),
                status,
                output: String::new(),
            },
        })
        .unwrap();
    }

    assert_eq!(dashboard.drain_updates(), 2);
    assert_eq!(dashboard.drain_updates(), 0);
}

#[test]
fn restore_terminal_leaves_the_alternate_screen() {
    let mut out: Vec<u8> = Vec::new();
    restore_terminal(&mut out);

    let written = String::from_utf8_lossy(&out);
    assert!(written.contains("\x1b[?1049l"), "{written:?}");
    assert!(written.contains("\x1b[?25h"), "{written:?}");
}
