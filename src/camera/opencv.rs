use super::{Backend, CameraCandidate, CameraOpener, FrameSource, Resolution};
use crate::error::Result;
use crate::models::RawFrame;
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

/// `videoio` API preference for a backend
pub fn api_preference(backend: Backend) -> i32 {
    match backend {
        Backend::Any => videoio::CAP_ANY,
        Backend::V4l2 => videoio::CAP_V4L2,
        Backend::DShow => videoio::CAP_DSHOW,
        Backend::Msmf => videoio::CAP_MSMF,
        Backend::AvFoundation => videoio::CAP_AVFOUNDATION,
        Backend::GStreamer => videoio::CAP_GSTREAMER,
        Backend::FFmpeg => videoio::CAP_FFMPEG,
    }
}

/// Opens local devices through `VideoCapture`
#[derive(Debug, Default)]
pub struct OpenCvOpener;

impl CameraOpener for OpenCvOpener {
    type Source = OpenCvCamera;

    fn open(&mut self, candidate: &CameraCandidate) -> Result<Option<OpenCvCamera>> {
        let mut cap = VideoCapture::new(candidate.index, api_preference(candidate.backend))?;
        match cap.is_opened() {
            Ok(true) => Ok(Some(OpenCvCamera {
                cap,
                released: false,
            })),
            Ok(false) => {
                cap.release()?;
                Ok(None)
            }
            Err(e) => {
                let _ = cap.release();
                Err(e.into())
            }
        }
    }
}

/// An opened `VideoCapture`, released on drop
pub struct OpenCvCamera {
    cap: VideoCapture,
    released: bool,
}

impl FrameSource for OpenCvCamera {
    fn read_frame(&mut self) -> Result<Option<RawFrame>> {
        let mut frame = Mat::default();
        if !self.cap.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }

        // Devices deliver BGR.
        let mut rgb = Mat::default();
        imgproc::cvt_color(&frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let data = rgb.data_bytes()?.to_vec();
        RawFrame::from_rgb(data, width, height).map(Some)
    }

    fn request_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.cap.set(videoio::CAP_PROP_FRAME_WIDTH, resolution.width as f64)?;
        self.cap.set(videoio::CAP_PROP_FRAME_HEIGHT, resolution.height as f64)?;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.cap.release() {
            log::warn!("Failed to release camera: {}", e);
        }
        self.released = true;
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.release();
    }
}
