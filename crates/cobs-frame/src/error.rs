/// Errors reported by the framing codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The destination buffer cannot hold the result.
    DestTooSmall,
    /// The input is not a well-formed encoded frame: a zero byte where
    /// none may occur, or a count that overruns the remaining input.
    Malformed,
}
