/// Decoded payload bytes and the path that produced them
pub mod candidate;
/// Raw and preprocessed frames
pub mod frame;
/// Normalized key/value record
pub mod record;

pub use candidate::{DecodeCandidate, DecodeSource};
pub use frame::{PreprocessedFrame, RawFrame};
pub use record::ParsedRecord;
