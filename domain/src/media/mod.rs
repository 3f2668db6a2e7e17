//! Media value objects (audio, speech, images)

pub mod values;

pub use values::{AudioClip, DataUriError, ImageAsset, SpeechAudio, Transcript};
