use crate::capture::{backend, image_to_bgr};
use hue_tracker::pipeline::{Annotation, FrameReport};
use hue_tracker::session::FrameSink;
use hue_tracker::Result;
use opencv::{
    core::{self, Mat, Point, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::VideoWriter,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Hershey glyphs are about 22 px tall at scale 1.0.
const HERSHEY_PX_AT_UNIT_SCALE: f64 = 22.0;

/// Shows composed frames in a `highgui` window and optionally records them.
pub struct WindowSink {
    window: String,
    show_window: bool,
    recording: Option<Recording>,
}

struct Recording {
    path: PathBuf,
    fps: f64,
    writer: Option<VideoWriter>,
}

impl WindowSink {
    pub fn new(window: &str, show_window: bool, record_to: Option<PathBuf>, fps: f64) -> Result<Self> {
        if show_window {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE).map_err(backend)?;
        }
        Ok(Self {
            window: window.to_string(),
            show_window,
            recording: record_to.map(|path| Recording {
                path,
                fps,
                writer: None,
            }),
        })
    }

    pub fn close(&mut self) -> Result<()> {
        if let Some(recording) = self.recording.as_mut() {
            if let Some(writer) = recording.writer.as_mut() {
                writer.release().map_err(backend)?;
                info!(path = %recording.path.display(), "recording saved");
            }
        }
        if self.show_window {
            highgui::destroy_all_windows().map_err(backend)?;
        }
        Ok(())
    }
}

impl FrameSink for WindowSink {
    fn show(&mut self, report: &FrameReport) -> Result<()> {
        let mut output_frame = image_to_bgr(&report.output).map_err(backend)?;

        // Without a TrueType font the library leaves caption text to us.
        if let Some(annotation) = report.annotation.as_ref().filter(|_| !report.text_rendered) {
            draw_caption(&mut output_frame, annotation).map_err(backend)?;
        }

        if let Some(recording) = self.recording.as_mut() {
            recording.write(&output_frame).map_err(backend)?;
        }
        if self.show_window {
            highgui::imshow(&self.window, &output_frame).map_err(backend)?;
        }
        Ok(())
    }

    fn poll_key(&mut self, delay: Duration) -> Result<Option<i32>> {
        if !self.show_window {
            return Ok(None);
        }
        let key = highgui::wait_key(delay.as_millis().max(1) as i32).map_err(backend)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(Some(key & 0xFF))
    }
}

impl Recording {
    fn write(&mut self, frame: &Mat) -> opencv::Result<()> {
        if self.writer.is_none() {
            let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
            let size = core::Size::new(frame.cols(), frame.rows());
            let path = self.path.to_string_lossy();
            let writer = VideoWriter::new(&path, fourcc, self.fps, size, true)?;
            if !writer.is_opened()? {
                return Err(opencv::Error::new(
                    core::StsError,
                    format!("Cannot save the video to {path}"),
                ));
            }
            self.writer = Some(writer);
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.write(frame)?;
        }
        Ok(())
    }
}

fn draw_caption(frame: &mut Mat, annotation: &Annotation) -> opencv::Result<()> {
    let [r, g, b] = annotation.text_color.0;
    imgproc::put_text(
        frame,
        &annotation.text,
        Point::new(annotation.text_origin.x, annotation.text_origin.y),
        imgproc::FONT_HERSHEY_SIMPLEX,
        annotation.text_scale as f64 / HERSHEY_PX_AT_UNIT_SCALE,
        Scalar::new(b as f64, g as f64, r as f64, 0.0),
        1,
        imgproc::LINE_8,
        false,
    )
}
