/// Pads `bytes` with zeros on the right up to the next multiple of `multiple_of`.
pub fn right_pad_bytes(bytes: impl AsRef<[u8]>, multiple_of: usize) -> Vec<u8> {
    let mut padded = bytes.as_ref().to_vec();
    padded.resize(padded.len().next_multiple_of(multiple_of), 0);
    padded
}
