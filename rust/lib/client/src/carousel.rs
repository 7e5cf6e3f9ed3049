//! Cyclic image browsing for location and reservation cards.

/// Shown when a record carries no images.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200?text=No+Image";

/// Index after `current`, wrapping to 0. Stays at 0 when `len` is 0.
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current % len + 1) % len
}

/// Index before `current`, wrapping to `len - 1`. Stays at 0 when `len` is 0.
pub fn prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current % len + len - 1) % len
}

#[derive(Debug, Clone)]
pub struct Carousel {
    images: Vec<String>,
    index: usize,
}

impl Carousel {
    /// Start at the first image. An empty list is replaced by the placeholder,
    /// so there is always a current image.
    pub fn new(images: &[String]) -> Self {
        let images = if images.is_empty() {
            vec![PLACEHOLDER_IMAGE.to_string()]
        } else {
            images.to_vec()
        };
        Self { images, index: 0 }
    }

    pub fn current(&self) -> &str {
        &self.images[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Prev/next controls only make sense with more than one image.
    pub fn has_controls(&self) -> bool {
        self.images.len() > 1
    }

    pub fn next(&mut self) -> &str {
        self.index = next_index(self.index, self.images.len());
        self.current()
    }

    pub fn prev(&mut self) -> &str {
        self.index = prev_index(self.index, self.images.len());
        self.current()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
