//! Camera stream intake: multipart splitting, JPEG decode, frame delivery.

pub mod mjpeg;
pub mod stream;
