//! Recording collaborators and fixtures shared by the station tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use tempfile::TempDir;
use weatherlog_core::acquisition::{AcquisitionError, Reading, Sensor};
use weatherlog_core::clock::{Clock, Zone};
use weatherlog_core::config::StationConfig;
use weatherlog_core::mail::{MailError, MailMessage, Mailer};
use weatherlog_core::render::{Chart, RenderError, Renderer};
use weatherlog_core::station::Station;

/// 2024-10-27 00:00 UTC
pub const START: i64 = 1_729_987_200;

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub file_name: String,
    pub series: Vec<String>,
    pub points: usize,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer(pub Rc<RefCell<Vec<RenderedChart>>>);

impl Renderer for RecordingRenderer {
    fn render(&self, chart: &Chart<'_>, path: &Path) -> Result<(), RenderError> {
        fs::write(path, "chart")?;
        self.0.borrow_mut().push(RenderedChart {
            file_name: path.file_name().unwrap().to_string_lossy().into_owned(),
            series: chart.series.iter().map(|s| s.name.to_string()).collect(),
            points: chart.timestamps.len(),
        });
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingMailer(pub Rc<RefCell<Vec<MailMessage>>>);

impl Mailer for RecordingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.0.borrow_mut().push(message.clone());
        Ok(())
    }
}

#[derive(Clone)]
pub struct SharedClock(pub Rc<Cell<i64>>);

impl Clock for SharedClock {
    fn now(&self) -> i64 {
        self.0.get()
    }
}

pub struct FixedSensor(pub Reading);

impl Sensor for FixedSensor {
    fn measure(&mut self) -> Result<Reading, AcquisitionError> {
        Ok(self.0)
    }
}

pub fn reading(temperature: f64) -> Reading {
    Reading {
        temperature,
        pressure_raw: 990.0,
        pressure_sea_level: 1016.25,
        rel_humidity: 55.0,
    }
}

fn test_config(dir: &TempDir) -> StationConfig {
    let root = dir.path();
    let mut config = StationConfig::default();
    config.zone = Zone::UTC;
    config.paths.data_dir = root.join("data");
    config.paths.log_dir = root.join("logs");
    config.paths.images_web_dir = root.join("images_web");
    config.paths.images_mail_dir = root.join("images_mail");
    config.paths.status_page = Some(root.join("index.html"));
    config.mail.sender = "station@example.org".to_string();
    config.mail.recipients = vec!["family@example.org".to_string()];
    config
}

pub struct Fixture {
    _dir: TempDir,
    pub station: Station,
    pub clock: Rc<Cell<i64>>,
    pub charts: Rc<RefCell<Vec<RenderedChart>>>,
    pub mails: Rc<RefCell<Vec<MailMessage>>>,
}

/// A station in UTC with its clock at [`START`]
pub fn fixture(configure: impl FnOnce(&mut StationConfig)) -> Fixture {
    fixture_at(START, configure)
}

/// A station with its clock at `start`
pub fn fixture_at(start: i64, configure: impl FnOnce(&mut StationConfig)) -> Fixture {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    configure(&mut config);
    fs::write(
        dir.path().join("index.html"),
        "<html>\n<p>Last Update: -</p>\n</html>\n",
    )
    .unwrap();

    let clock = Rc::new(Cell::new(start));
    let renderer = RecordingRenderer::default();
    let mailer = RecordingMailer::default();
    let charts = renderer.0.clone();
    let mails = mailer.0.clone();
    let station = Station::new(config, renderer)
        .with_clock(SharedClock(clock.clone()))
        .with_mailer(mailer);
    Fixture {
        _dir: dir,
        station,
        clock,
        charts,
        mails,
    }
}
