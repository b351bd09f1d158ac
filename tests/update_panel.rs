//! End-to-end panel sessions against in-memory sinks.
//!
//! Interactive buffers exercise the live redraw path; non-interactive
//! buffers exercise the fallback path. No terminal required.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use ratatui::text::Text;
use update_panel::display::Sink;
use update_panel::{PanelConfig, PanelContext, PanelError, UpdatePanel};

const SHOW_CURSOR: &str = "\x1b[?25h";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Job {
    name: String,
    count: u32,
}

fn job(name: &str, count: u32) -> Job {
    Job {
        name: name.into(),
        count,
    }
}

fn render_job(job: &Job) -> Text<'static> {
    Text::raw(format!("{}:{}", job.name, job.count))
}

#[derive(Debug)]
enum TestError {
    Panel(PanelError),
    Producer(&'static str),
}

impl From<PanelError> for TestError {
    fn from(e: PanelError) -> Self {
        TestError::Panel(e)
    }
}

fn quiet_config() -> PanelConfig {
    PanelConfig {
        auto_refresh: false,
        ..PanelConfig::default()
    }
}

#[tokio::test]
async fn result_passes_through_and_last_state_survives() {
    let (sink, _) = Sink::buffer(true);
    let kept: Arc<Mutex<Option<PanelContext<Job>>>> = Arc::default();
    let slot = Arc::clone(&kept);

    let value = UpdatePanel::<Job>::new(sink)
        .render(render_job)
        .start(move |ctx| async move {
            ctx.set_status(job("first", 1));
            ctx.set_status(job("last", 2));
            *slot.lock() = Some(ctx.clone());
            Ok::<_, PanelError>("done")
        })
        .await
        .unwrap();

    assert_eq!(value, "done");
    let ctx = kept.lock().take().expect("producer stored its context");
    assert_eq!(ctx.status(), job("last", 2));
}

#[tokio::test]
async fn fallback_emits_each_distinct_state_once() {
    let (sink, buffer) = Sink::buffer(false);

    UpdatePanel::<Job>::new(sink)
        .with_config(quiet_config())
        .render(render_job)
        .start(|ctx| async move {
            for state in [job("A", 0), job("A", 0), job("B", 1)] {
                ctx.set_status(state);
                ctx.refresh();
                tokio::time::sleep(Duration::from_millis(40)).await;
            }
            Ok::<_, PanelError>(())
        })
        .await
        .unwrap();

    assert_eq!(buffer.contents(), "A:0\nB:1\n");
}

#[tokio::test]
async fn fallback_never_drops_the_final_state() {
    let (sink, buffer) = Sink::buffer(false);

    UpdatePanel::<Job>::new(sink)
        .with_config(quiet_config())
        .render(render_job)
        .start(|ctx| async move {
            // No refresh, no sleep: only the shutdown pass can see this.
            ctx.set_status(job("final", 9));
            Ok::<_, PanelError>(())
        })
        .await
        .unwrap();

    assert_eq!(buffer.contents(), "final:9\n");
}

#[tokio::test]
async fn producer_error_is_returned_verbatim() {
    let (sink, buffer) = Sink::buffer(true);

    let result: Result<(), TestError> = UpdatePanel::<Job>::new(sink)
        .render(render_job)
        .start(|ctx| async move {
            ctx.set_status(job("failing", 1));
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(TestError::Producer("disk on fire"))
        })
        .await;

    match result {
        Err(TestError::Producer(msg)) => assert_eq!(msg, "disk on fire"),
        other => panic!("expected producer error, got {other:?}"),
    }
    assert!(buffer.contents().ends_with(SHOW_CURSOR), "display torn down");
}

#[tokio::test]
#[should_panic(expected = "producer blew up")]
async fn producer_panic_is_resumed_on_caller() {
    let (sink, _) = Sink::buffer(false);
    let _ = UpdatePanel::<Job>::new(sink)
        .render(render_job)
        .start(|_ctx| async move {
            if true {
                panic!("producer blew up");
            }
            Ok::<_, PanelError>(())
        })
        .await;
}

#[tokio::test]
async fn live_column_idle_without_auto_refresh() {
    let (sink, _) = Sink::buffer(true);
    let renders = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&renders);

    UpdatePanel::<Job>::new(sink)
        .auto_refresh(false)
        .render(move |j| {
            counter.fetch_add(1, Ordering::SeqCst);
            render_job(j)
        })
        .start(|ctx| async move {
            for i in 0..5 {
                ctx.set_status(job("quiet", i));
                tokio::time::sleep(Duration::from_millis(15)).await;
            }
            Ok::<_, PanelError>(())
        })
        .await
        .unwrap();

    // Start frame and stop frame only.
    assert_eq!(renders.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn live_column_repaints_with_auto_refresh() {
    let (sink, _) = Sink::buffer(true);
    let renders = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&renders);
    let config = PanelConfig {
        refresh_interval_ms: 20,
        ..PanelConfig::default()
    };

    UpdatePanel::<Job>::new(sink)
        .with_config(config)
        .render(move |j| {
            counter.fetch_add(1, Ordering::SeqCst);
            render_job(j)
        })
        .start(|ctx| async move {
            ctx.set_status(job("busy", 1));
            tokio::time::sleep(Duration::from_millis(250)).await;
            Ok::<_, PanelError>(())
        })
        .await
        .unwrap();

    assert!(renders.load(Ordering::SeqCst) > 4);
}

#[tokio::test]
async fn explicit_refresh_repaints_live_panel() {
    let (sink, buffer) = Sink::buffer(true);

    UpdatePanel::<Job>::new(sink)
        .with_config(quiet_config())
        .render(render_job)
        .start(|ctx| async move {
            ctx.set_status(job("refreshed", 3));
            ctx.refresh();
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, PanelError>(())
        })
        .await
        .unwrap();

    let out = buffer.contents();
    // Drawn by the refresh and again by the stop pass, then cleared.
    assert!(out.matches("refreshed:3").count() >= 2, "{out:?}");
    assert!(out.ends_with(SHOW_CURSOR));
}

#[tokio::test]
async fn render_panic_aborts_the_session() {
    let (sink, _) = Sink::buffer(true);

    let result: Result<(), PanelError> = UpdatePanel::<Job>::new(sink)
        .render(|j: &Job| {
            if j.count > 0 {
                panic!("cannot draw {}", j.name);
            }
            render_job(j)
        })
        .start(|ctx| async move {
            ctx.set_status(job("bad", 1));
            ctx.refresh();
            std::future::pending::<()>().await;
            Ok(())
        })
        .await;

    match result {
        Err(PanelError::RenderPanicked(msg)) => assert_eq!(msg, "cannot draw bad"),
        other => panic!("expected render panic, got {other:?}"),
    }
}

#[tokio::test]
async fn dropping_the_session_stops_everything() {
    struct SetOnDrop(Arc<AtomicBool>);
    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    let (sink, buffer) = Sink::buffer(true);
    let dropped = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&dropped);

    let session = UpdatePanel::<Job>::new(sink)
        .render(render_job)
        .start(move |ctx| async move {
            let _guard = SetOnDrop(flag);
            ctx.set_status(job("forever", 1));
            std::future::pending::<()>().await;
            Ok::<_, PanelError>(())
        });
    assert!(tokio::time::timeout(Duration::from_millis(50), session)
        .await
        .is_err());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(dropped.load(Ordering::SeqCst), "producer aborted");
    assert!(buffer.contents().ends_with(SHOW_CURSOR), "cursor restored");
}

#[test]
fn blocking_form_runs_sync_producer() {
    let (sink, buffer) = Sink::buffer(false);

    let last = UpdatePanel::<Job>::new(sink)
        .render(render_job)
        .start_blocking(|ctx| {
            for i in 1..=3 {
                ctx.set_status(job("sync", i));
                std::thread::sleep(Duration::from_millis(10));
            }
            Ok::<_, PanelError>(ctx.status())
        })
        .unwrap();

    assert_eq!(last, job("sync", 3));
    let out = buffer.contents();
    assert_eq!(out.lines().last(), Some("sync:3"));
}

#[test]
fn blocking_form_returns_producer_error() {
    let (sink, _) = Sink::buffer(false);
    let result: Result<u32, TestError> = UpdatePanel::<Job>::new(sink)
        .render(render_job)
        .start_blocking(|_| Err(TestError::Producer("nope")));
    assert!(matches!(result, Err(TestError::Producer("nope"))));
}
