use std::cell::Cell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};

use snapmark::capture::{
    CaptureBackend, CaptureContext, CaptureError, CommandBackend, Environment, ScreenLayout,
};
use snapmark::config::Config;
use snapmark::domain::{Point, Rect};
use snapmark::session::{Action, InputEvent, OverlaySession, Response};

struct Probe {
    name: &'static str,
    available: bool,
    probes: Rc<Cell<usize>>,
}

impl CaptureBackend for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn is_available(&self, _env: &dyn Environment) -> bool {
        self.probes.set(self.probes.get() + 1);
        self.available
    }

    fn capture(&self, geometry: Rect) -> Result<RgbaImage, CaptureError> {
        let (w, h) = (geometry.width() as u32, geometry.height() as u32);
        Ok(RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255])))
    }
}

struct Env {
    programs: Vec<&'static str>,
}

impl Environment for Env {
    fn var(&self, key: &str) -> Option<String> {
        match key {
            "XDG_SESSION_TYPE" => Some("wayland".to_string()),
            "XDG_CURRENT_DESKTOP" => Some("GNOME".to_string()),
            _ => None,
        }
    }

    fn has_program(&self, program: &str) -> bool {
        self.programs.contains(&program)
    }
}

struct Monitors(Vec<Rect>);

impl ScreenLayout for Monitors {
    fn monitors(&self) -> Result<Vec<Rect>, CaptureError> {
        Ok(self.0.clone())
    }
}

fn dual_head() -> Box<Monitors> {
    Box::new(Monitors(vec![
        Rect::from_xywh(-1280, 0, 1280, 1024),
        Rect::from_xywh(0, -56, 1920, 1080),
    ]))
}

fn probes(flags: &[bool], counter: &Rc<Cell<usize>>) -> Vec<Box<dyn CaptureBackend>> {
    const NAMES: [&str; 5] = ["native", "grim", "gnome-screenshot", "spectacle", "import"];
    flags
        .iter()
        .zip(NAMES)
        .map(|(&available, name)| {
            Box::new(Probe {
                name,
                available,
                probes: counter.clone(),
            }) as Box<dyn CaptureBackend>
        })
        .collect()
}

#[test]
fn pinned_backend_is_first_available_for_every_flag_combination() {
    for bits in 0u32..32 {
        let flags: Vec<bool> = (0..5).map(|i| bits & (1 << i) != 0).collect();
        let counter = Rc::new(Cell::new(0));
        let env = Box::new(Env { programs: vec![] });
        let mut ctx = CaptureContext::new(probes(&flags, &counter), env, dual_head());

        let expected = flags.iter().position(|&f| f);
        let first = ctx.active_backend_name();
        let probed = counter.get();
        assert_eq!(probed, expected.map_or(5, |i| i + 1));

        let second = ctx.active_backend_name();
        assert_eq!(first, second);
        assert_eq!(counter.get(), probed, "second lookup must not re-probe");
        assert_eq!(first.is_some(), expected.is_some());
    }
}

#[test]
fn command_backends_follow_desktop_and_path() {
    let env = Env {
        programs: vec!["grim", "gnome-screenshot", "spectacle"],
    };
    assert!(CommandBackend::grim().is_available(&env));
    assert!(CommandBackend::gnome_screenshot().is_available(&env));
    assert!(!CommandBackend::spectacle().is_available(&env));
    assert!(!CommandBackend::imagemagick().is_available(&env));
}

#[test]
fn session_over_negative_origin_desktop() {
    let counter = Rc::new(Cell::new(0));
    let env = Box::new(Env { programs: vec![] });
    let mut ctx = CaptureContext::new(probes(&[false, true], &counter), env, dual_head());
    assert_eq!(ctx.virtual_geometry(), Rect::new(-1280, -56, 1920, 1024));

    let mut session = OverlaySession::start(&mut ctx, &Config::default()).unwrap();
    assert_eq!(session.capture().width(), 3200);
    assert_eq!(session.capture().height(), 1080);

    // Selection partially past the right edge of the capture
    session.handle_input(InputEvent::press(Point::new(3100, 1000)));
    session.handle_input(InputEvent::motion(Point::new(3300, 1200)));
    session.handle_input(InputEvent::release(Point::new(3300, 1200)));
    let Response::Export { image, .. } = session.apply(Action::CopyToClipboard) else {
        panic!("expected export");
    };
    assert_eq!((image.width(), image.height()), (100, 80));
    // First pixel comes from capture pixel (3100, 1000)
    assert_eq!(image.get_pixel(0, 0).0, [(3100 % 256) as u8, (1000 % 256) as u8, 0, 255]);
}

#[test]
fn start_fails_without_backend() {
    let counter = Rc::new(Cell::new(0));
    let env = Box::new(Env { programs: vec![] });
    let mut ctx = CaptureContext::new(probes(&[false, false], &counter), env, dual_head());
    assert!(matches!(
        OverlaySession::start(&mut ctx, &Config::default()),
        Err(CaptureError::Unavailable)
    ));
}
