use crate::error::FrameError;
use crate::MAX_RUN;

/// Encode `input` into `output`, returning the encoded length.
///
/// Every run of up to 254 non-zero input bytes is copied verbatim,
/// preceded by a count byte of run length + 1. A zero input byte ends
/// a run and is consumed rather than copied; a run that fills without
/// seeing a zero is closed with the count 0xFF, meaning "continues, no
/// zero consumed". The output therefore contains no zero byte.
///
/// Fails with [`FrameError::DestTooSmall`] if `output` is shorter than
/// the encoding needs; sizing it with
/// [`max_encoded_len`](crate::max_encoded_len) rules that out.
pub fn encode(input: &[u8], output: &mut [u8]) -> Result<usize, FrameError> {
    if output.is_empty() {
        return Err(FrameError::DestTooSmall);
    }

    // `code_at` is the reserved slot for the count of the open run.
    let mut code_at = 0;
    let mut code: u8 = 1;
    let mut wr = 1;

    for &byte in input {
        if byte == 0 {
            output[code_at] = code;
            code_at = wr;
            code = 1;
            wr += 1;
            if wr > output.len() {
                return Err(FrameError::DestTooSmall);
            }
        } else {
            if wr >= output.len() {
                return Err(FrameError::DestTooSmall);
            }
            output[wr] = byte;
            wr += 1;
            code += 1;
            if code as usize == MAX_RUN + 1 {
                // Run full: close it and open the next immediately.
                output[code_at] = code;
                code_at = wr;
                code = 1;
                wr += 1;
                if wr > output.len() {
                    return Err(FrameError::DestTooSmall);
                }
            }
        }
    }

    output[code_at] = code;
    Ok(wr)
}
