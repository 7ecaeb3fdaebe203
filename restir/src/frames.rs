use log::trace;

use crate::{Error, Result};

/// Something that can tell when the GPU has finished working on a frame.
pub trait FrameFence {
    /// Blocks until the work tracked by this fence is done.
    fn wait(&self) -> Result<()>;
}

/// Fence backed by a queue submission.
#[derive(Clone, Debug)]
pub struct SubmissionFence {
    pub device: wgpu::Device,
    pub submission: wgpu::SubmissionIndex,
}

impl FrameFence for SubmissionFence {
    fn wait(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(self.submission.clone()),
                timeout: None,
            })
            .map(|_| ())
            .map_err(|err| Error::FenceWait(err.to_string()))
    }
}

/// Round-robin set of frame slots.
///
/// Everything the CPU writes on a per-frame basis (uniforms, lights, bind
/// groups pointing at them) is replicated per slot; a slot is handed out only
/// after the frame that used it previously has finished executing, so the CPU
/// can run at most `len` frames ahead of the GPU.
#[derive(Debug)]
pub struct FrameSlots<F> {
    fences: Vec<Option<F>>,
    current: usize,
}

impl<F> FrameSlots<F> {
    pub fn new(len: usize) -> Self {
        assert!(len > 0);

        Self {
            fences: (0..len).map(|_| None).collect(),
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.fences.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Records that the current slot's frame has been submitted and moves
    /// onto the next slot.
    pub fn submit(&mut self, fence: F) {
        self.fences[self.current] = Some(fence);
        self.current = (self.current + 1) % self.fences.len();
    }
}

impl<F> FrameSlots<F>
where
    F: FrameFence,
{
    /// Waits until the current slot is free for reuse and returns its index.
    pub fn acquire(&mut self) -> Result<usize> {
        if let Some(fence) = self.fences[self.current].take() {
            trace!("Waiting for frame slot {}", self.current);

            fence.wait()?;
        }

        Ok(self.current)
    }

    /// Waits until all slots are free, e.g. before resources shared by all
    /// of them get re-created.
    pub fn drain(&mut self) -> Result<()> {
        for fence in self.fences.iter_mut() {
            if let Some(fence) = fence.take() {
                fence.wait()?;
            }
        }

        Ok(())
    }
}
