//! Model clients for Artbooth.
//!
//! `OpenAIVisionDescriber` turns a photo into a scene description and
//! `OpenAIImageSynthesizer` renders a styled image from a prompt. Both
//! implement the capability traits from `artbooth_core::vision`.

mod image_synthesizer;
mod openai;
mod vision_describer;

pub use image_synthesizer::{DEFAULT_IMAGE_MODEL, OpenAIImageSynthesizer};
pub use vision_describer::{DEFAULT_VISION_MODEL, DESCRIBE_INSTRUCTION, OpenAIVisionDescriber};
