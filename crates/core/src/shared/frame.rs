/// A single grayscale frame: one luma byte per pixel, row-major.
///
/// The tracking core never inspects pixels; it only hands frames to the
/// detector. The `index` is the producer's sequence number, so gaps reveal
/// dropped frames.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must equal width * height"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// All-black frame of the given size.
    pub fn blank(width: u32, height: u32, index: usize) -> Self {
        Self::new(vec![0u8; width as usize * height as usize], width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![7u8; 6];
        let frame = Frame::new(data.clone(), 3, 2, 9);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 9);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_blank_is_zeroed() {
        let frame = Frame::blank(4, 3, 0);
        assert_eq!(frame.data().len(), 12);
        assert!(frame.data().iter().all(|&p| p == 0));
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 5], 2, 2, 0);
    }
}
