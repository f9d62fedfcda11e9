use hue_tracker::session::FrameSource;
use hue_tracker::{Result, TrackerError};
use image::RgbImage;
use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

pub const DEFAULT_CAMERA: i32 = 0;

pub fn backend(e: opencv::Error) -> TrackerError {
    TrackerError::Backend(e.to_string())
}

/// Where the video comes from: a file path, or the default camera.
#[derive(Debug, Clone)]
pub enum VideoInput {
    File(String),
    Camera(i32),
}

impl VideoInput {
    fn name(&self) -> String {
        match self {
            VideoInput::File(path) => path.clone(),
            VideoInput::Camera(index) => format!("camera {index}"),
        }
    }
}

/// `VideoCapture` wrapped as a `FrameSource`. Frames leave as RGB.
pub struct OpenCvSource {
    cap: VideoCapture,
    input: VideoInput,
    frame_size: (u32, u32),
}

impl OpenCvSource {
    pub fn open(input: VideoInput) -> Result<Self> {
        let unavailable = |reason: String| TrackerError::SourceUnavailable {
            source_name: input.name(),
            reason,
        };

        let cap = match &input {
            VideoInput::File(path) => VideoCapture::from_file(path, videoio::CAP_ANY),
            VideoInput::Camera(index) => VideoCapture::new(*index, videoio::CAP_ANY),
        }
        .map_err(|e| unavailable(e.to_string()))?;

        if !cap.is_opened().map_err(|e| unavailable(e.to_string()))? {
            return Err(unavailable("capture did not open".into()));
        }

        let frame_width = cap.get(videoio::CAP_PROP_FRAME_WIDTH).map_err(backend)? as u32;
        let frame_height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT).map_err(backend)? as u32;

        Ok(Self {
            cap,
            input,
            frame_size: (frame_width, frame_height),
        })
    }

    pub fn release(&mut self) -> Result<()> {
        self.cap.release().map_err(backend)
    }
}

impl FrameSource for OpenCvSource {
    fn describe(&self) -> String {
        self.input.name()
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    fn read(&mut self) -> Result<Option<RgbImage>> {
        let mut frame = Mat::default();
        let grabbed = self.cap.read(&mut frame).map_err(backend)?;
        // An empty frame is how both files and cameras signal the end.
        if !grabbed || frame.empty() {
            return Ok(None);
        }
        bgr_to_image(&frame).map(Some).map_err(backend)
    }
}

/// Converts an OpenCV BGR frame into an owned RGB image.
pub fn bgr_to_image(frame: &Mat) -> opencv::Result<RgbImage> {
    let mut rgb_frame = Mat::default();
    imgproc::cvt_color(frame, &mut rgb_frame, imgproc::COLOR_BGR2RGB, 0)?;
    let width = rgb_frame.cols() as u32;
    let height = rgb_frame.rows() as u32;
    let buffer: Vec<u8> = rgb_frame.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        opencv::Error::new(core::StsUnmatchedSizes, "frame buffer does not match its geometry")
    })
}

/// Converts an RGB image into an OpenCV BGR frame for display or recording.
pub fn image_to_bgr(image: &RgbImage) -> opencv::Result<Mat> {
    let mut rgb_frame = Mat::new_rows_cols_with_default(
        image.height() as i32,
        image.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )?;
    rgb_frame.data_bytes_mut()?.copy_from_slice(image.as_raw());

    let mut bgr_frame = Mat::default();
    imgproc::cvt_color(&rgb_frame, &mut bgr_frame, imgproc::COLOR_RGB2BGR, 0)?;
    Ok(bgr_frame)
}
