use doodle::shake::{drain_requests, AccelSample, DialogGuard, ShakeDetector, ShakeMonitor};
use doodle::{Canvas, ContactId, DoodleConfig, TouchEvent, TouchSample};
use egui::{pos2, Color32};

fn drawn_canvas() -> Canvas {
    let mut canvas = Canvas::from_config(&DoodleConfig::default());
    canvas.resize(64, 64);
    canvas.handle_all([
        TouchEvent::Press {
            id: ContactId(1),
            pos: pos2(5.0, 5.0),
        },
        TouchEvent::Move(vec![TouchSample::new(1, 40.0, 40.0)]),
        TouchEvent::Move(vec![TouchSample::new(1, 60.0, 20.0)]),
        TouchEvent::Release { id: ContactId(1) },
    ]);
    canvas
}

fn shake_on_sensor_thread(mut monitor: ShakeMonitor, shakes: usize) -> ShakeMonitor {
    std::thread::spawn(move || {
        for _ in 0..shakes {
            monitor.feed(AccelSample::new(0.0, 0.0, 0.0));
            monitor.feed(AccelSample::new(25.0, 5.0, 0.0));
        }
        monitor
    })
    .join()
    .unwrap()
}

#[test]
fn test_confirmed_shake_clears_canvas() {
    let guard = DialogGuard::new();
    let (monitor, mut requests) = ShakeMonitor::channel(ShakeDetector::default(), guard.clone());
    let mut canvas = drawn_canvas();

    shake_on_sensor_thread(monitor, 5);

    assert!(drain_requests(&mut requests));
    assert!(guard.is_visible());

    // User confirms.
    guard.dismiss();
    canvas.clear();

    assert!(canvas.render().is_uniform(Color32::WHITE));
}

#[test]
fn test_cancelled_shake_keeps_drawing() {
    let guard = DialogGuard::new();
    let (monitor, mut requests) = ShakeMonitor::channel(ShakeDetector::default(), guard.clone());
    let canvas = drawn_canvas();
    let before = canvas.render();

    let monitor = shake_on_sensor_thread(monitor, 3);
    assert!(drain_requests(&mut requests));

    // User cancels.
    guard.dismiss();

    assert_eq!(canvas.render(), before);
    assert!(!guard.is_visible());

    // The next shake can prompt again.
    shake_on_sensor_thread(monitor, 1);
    assert!(drain_requests(&mut requests));
}

#[test]
fn test_open_dialog_blocks_shake_prompt() {
    let guard = DialogGuard::new();
    let (monitor, mut requests) = ShakeMonitor::channel(ShakeDetector::default(), guard.clone());

    // e.g. the color dialog is open
    assert!(guard.try_raise());
    shake_on_sensor_thread(monitor, 4);

    assert!(!drain_requests(&mut requests));
}

#[test]
fn test_finger_lifted_under_prompt_commits_once() {
    let guard = DialogGuard::new();
    let (monitor, mut requests) = ShakeMonitor::channel(ShakeDetector::default(), guard.clone());
    let mut canvas = Canvas::from_config(&DoodleConfig::default());
    canvas.resize(64, 64);
    canvas.handle_all([
        TouchEvent::Press {
            id: ContactId(3),
            pos: pos2(5.0, 32.0),
        },
        TouchEvent::Move(vec![TouchSample::new(3, 30.0, 32.0)]),
        TouchEvent::Move(vec![TouchSample::new(3, 60.0, 32.0)]),
    ]);

    shake_on_sensor_thread(monitor, 1);
    assert!(drain_requests(&mut requests));
    let modal = guard.is_visible();
    assert!(modal);

    canvas.handle_all_modal([TouchEvent::Release { id: ContactId(3) }], modal);
    assert!(!canvas.tracker().is_live(ContactId(3)));

    // User cancels; the stroke is on the surface, not floating.
    guard.dismiss();
    let committed = canvas.surface().clone();
    assert_ne!(committed.pixel(20, 32), Some(Color32::WHITE));

    // Reusing the id starts a fresh stroke and keeps the old one.
    canvas.handle(TouchEvent::Press {
        id: ContactId(3),
        pos: pos2(5.0, 5.0),
    });
    assert_eq!(canvas.surface().pixel(20, 32), committed.pixel(20, 32));
}
