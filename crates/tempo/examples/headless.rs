//! Headless walkthrough of the session controls.
//!
//! Builds the application with the user's configuration, attaches it to a
//! window and drives a few sessions through keyboard shortcuts, printing the
//! panel after each step.
//!
//! Run with `RUST_LOG=tempo=debug` to see what happens underneath.

use std::sync::Arc;

use tempo::Application;
use tempo::accel::parse;
use tempo::session::ManualSession;
use tempo::widget::{Menu, SessionControlPanel, Window};
use tracing_subscriber::EnvFilter;

struct PrintMenu;

impl Menu for PrintMenu {
    fn popup(&self) {
        println!("  [menu] Preferences | About | Quit");
    }
}

fn show(step: &str, panel: &SessionControlPanel) {
    let shown = |visible: bool| if visible { "shown" } else { "hidden" };
    println!("{step}");
    println!(
        "  title: {:<16} start: {:<6} stop: {:<6} reset: {}",
        panel.title(),
        shown(panel.start_button().is_visible()),
        shown(panel.stop_button().is_visible()),
        if panel.reset_button().is_enabled() { "enabled" } else { "disabled" },
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Application::load_config()?);
    let mut session = None;
    let app = Application::new(config, Arc::new(PrintMenu), |bus| {
        let manual = Arc::new(ManualSession::new(bus));
        session = Some(manual.clone());
        manual
    })?;
    let session = session.ok_or("controller was not built")?;

    let window = Window::new("Tempo");
    app.attach(&window)?;

    let start = app.shortcuts().label("start")?;
    let stop = app.shortcuts().label("stop")?;
    let reset = app.shortcuts().label("reset")?;
    println!("shortcuts: start {start}, stop {stop}, reset {reset}");

    show("initial", app.panel());

    window.key_press(&parse(&start)?);
    show(&start, app.panel());

    session.finish();
    show("session finished", app.panel());

    window.key_press(&parse(&start)?);
    window.key_press(&parse(&stop)?);
    show(&format!("{start} then {stop}"), app.panel());

    app.config().set("shortcuts", "start", "<control>b");
    window.key_press(&parse("Ctrl+B")?);
    show("Ctrl+B (rebound start)", app.panel());

    window.key_press(&parse(&reset)?);
    show(&format!("{reset} while running (ignored)"), app.panel());

    window.key_press(&parse(&stop)?);
    window.key_press(&parse(&reset)?);
    show(&format!("{stop} then {reset}"), app.panel());

    app.panel().menu_button().click();
    Ok(())
}
