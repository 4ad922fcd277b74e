use crate::error::FrameError;

/// Decode `input` into `output`, returning the decoded length.
///
/// Exact inverse of [`encode`](crate::encode): read a count byte, copy
/// `count - 1` literal bytes, then emit a zero unless the count was
/// 0xFF (continuation) or the input is exhausted.
///
/// Total over malformed input: a zero count byte, a zero literal, or a
/// count that overruns the remaining input fails with
/// [`FrameError::Malformed`]; output past `output.len()` fails with
/// [`FrameError::DestTooSmall`]. No write ever lands outside `output`.
pub fn decode(input: &[u8], output: &mut [u8]) -> Result<usize, FrameError> {
    let mut rd = 0;
    let mut wr = 0;

    while rd < input.len() {
        let code = input[rd];
        if code == 0 {
            return Err(FrameError::Malformed);
        }
        rd += 1;

        let run = code as usize - 1;
        if rd + run > input.len() {
            // Truncated frame: the count promises more than remains.
            return Err(FrameError::Malformed);
        }
        for &byte in &input[rd..rd + run] {
            if byte == 0 {
                return Err(FrameError::Malformed);
            }
            if wr >= output.len() {
                return Err(FrameError::DestTooSmall);
            }
            output[wr] = byte;
            wr += 1;
        }
        rd += run;

        if code != 0xFF && rd < input.len() {
            if wr >= output.len() {
                return Err(FrameError::DestTooSmall);
            }
            output[wr] = 0;
            wr += 1;
        }
    }

    Ok(wr)
}
