use crate::frame::DataFrame;
use crate::Errors;
use anyhow::Result;
use log::debug;
use std::collections::VecDeque;

/// Number of frames which are held in memory at the same time
pub const DATA_BUFFER_SIZE: usize = 2;

/// Ring buffer of the frames, index 0 is the previous frame, index 1 the current one
///
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frames: VecDeque<DataFrame>,
    pushed: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(DATA_BUFFER_SIZE),
            pushed: 0,
        }
    }

    /// Appends the frame, the oldest frame is evicted when the buffer is full
    ///
    pub fn push(&mut self, frame: DataFrame) {
        if self.frames.len() < DATA_BUFFER_SIZE {
            self.frames.push_back(frame);
            debug!("Initializing buffer; Buffer size is: {}", self.frames.len());
        } else {
            self.frames.pop_front();
            self.frames.push_back(frame);
            debug!("Updating buffer; Buffer size is: {}", self.frames.len());
        }
        self.pushed += 1;
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == DATA_BUFFER_SIZE
    }

    /// Total amount of frames pushed over the buffer lifetime
    ///
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    fn ensure_full(&self) -> Result<()> {
        if self.is_full() {
            Ok(())
        } else {
            Err(Errors::EmptyBuffer {
                resident: self.frames.len(),
            }
            .into())
        }
    }

    pub fn previous(&self) -> Result<&DataFrame> {
        self.ensure_full()?;
        Ok(&self.frames[0])
    }

    pub fn current(&self) -> Result<&DataFrame> {
        self.ensure_full()?;
        Ok(&self.frames[1])
    }

    /// The lastly pushed frame, available since the first push
    ///
    pub fn newest(&self) -> Option<&DataFrame> {
        self.frames.back()
    }

    pub fn newest_mut(&mut self) -> Option<&mut DataFrame> {
        self.frames.back_mut()
    }

    /// The previous frame and the mutable current frame
    ///
    pub fn pair_mut(&mut self) -> Result<(&DataFrame, &mut DataFrame)> {
        self.ensure_full()?;
        let (prev, curr) = self.frames.make_contiguous().split_at_mut(1);
        Ok((&prev[0], &mut curr[0]))
    }
}
