use crate::event::Attachment;

/// Attachments awaiting the next flush, in arrival order
pub struct Batch {
    items: Vec<Attachment>,
    max_size: usize,
    shrink_threshold: usize,
}

impl Batch {
    pub fn new(max_size: usize, shrink_threshold: usize) -> Self {
        Self {
            items: Vec::with_capacity(max_size.min(shrink_threshold)),
            max_size,
            shrink_threshold,
        }
    }

    pub fn push(&mut self, attachment: Attachment) {
        self.items.push(attachment);
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[Attachment] {
        &self.items
    }

    /// Empty the batch, keeping its storage unless it has grown past the
    /// shrink threshold.
    pub fn clear(&mut self) {
        self.items.clear();
        if self.items.capacity() > self.shrink_threshold {
            self.items = Vec::with_capacity(self.max_size.min(self.shrink_threshold));
        }
    }
}
