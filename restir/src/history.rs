use log::debug;

use crate::gpu;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryState {
    #[default]
    Idle,
    Accumulating,

    /// History image holds stale data and has to be cleared before the next
    /// accumulated frame
    ClearPending,
}

/// Drives the history accumulation: decides, per frame, whether the history
/// image has to be cleared and how the new frame gets blended into it.
#[derive(Clone, Debug)]
pub struct History {
    state: HistoryState,
    frame_index: i32,
    max_frames: u32,
}

impl History {
    pub fn new(max_frames: u32) -> Self {
        Self {
            state: HistoryState::Idle,
            frame_index: gpu::HistoryPassParams::DISABLED,
            max_frames,
        }
    }

    pub fn state(&self) -> HistoryState {
        self.state
    }

    pub fn set_max_frames(&mut self, max_frames: u32) {
        self.max_frames = max_frames;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match (self.state, enabled) {
            (HistoryState::Idle, true) => {
                debug!("History: enabled");

                self.state = HistoryState::ClearPending;
                self.frame_index = 0;
            }

            (HistoryState::Accumulating | HistoryState::ClearPending, false) => {
                debug!("History: disabled");

                self.state = HistoryState::Idle;
                self.frame_index = gpu::HistoryPassParams::DISABLED;
            }

            _ => (),
        }
    }

    /// Throws away everything accumulated so far (e.g. because the camera has
    /// moved).
    pub fn invalidate(&mut self) {
        if self.state == HistoryState::Accumulating {
            debug!("History: invalidated");

            self.state = HistoryState::ClearPending;
            self.frame_index = 0;
        }
    }

    /// Prepares history for the next frame.
    pub fn advance(&mut self) -> HistoryFrame {
        let clear = self.state == HistoryState::ClearPending;

        let params = gpu::HistoryPassParams {
            frame_index: self.frame_index,
            max_frames: self.max_frames,
            ..Default::default()
        };

        if self.state != HistoryState::Idle {
            self.state = HistoryState::Accumulating;

            // Saturates at the cap, where the accumulation freezes
            self.frame_index = self
                .frame_index
                .saturating_add(1)
                .min(self.max_frames.min(i32::MAX as u32) as i32);
        }

        HistoryFrame { params, clear }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HistoryFrame {
    pub params: gpu::HistoryPassParams,

    /// Whether the history image has to be cleared before accumulating
    pub clear: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let mut target = History::new(3);

        let frame = target.advance();

        assert_eq!(HistoryState::Idle, target.state());
        assert!(!frame.clear);
        assert!(!frame.params.is_enabled());

        // ---

        target.set_enabled(true);

        assert_eq!(HistoryState::ClearPending, target.state());

        let frame = target.advance();

        assert!(frame.clear);
        assert_eq!(0, frame.params.frame_index);
        assert_eq!(HistoryState::Accumulating, target.state());

        // ---

        let indices: Vec<_> = (0..5)
            .map(|_| {
                let frame = target.advance();

                assert!(!frame.clear);

                frame.params.frame_index
            })
            .collect();

        assert_eq!(vec![1, 2, 3, 3, 3], indices);

        // ---

        target.set_enabled(false);

        assert_eq!(HistoryState::Idle, target.state());
        assert!(!target.advance().params.is_enabled());

        // ---

        target.set_enabled(true);

        let frame = target.advance();

        assert!(frame.clear);
        assert_eq!(0, frame.params.frame_index);
    }

    #[test]
    fn enabling_twice_clears_once() {
        let mut target = History::new(1000);

        target.set_enabled(true);
        target.advance();
        target.set_enabled(true);

        let frame = target.advance();

        assert!(!frame.clear);
        assert_eq!(1, frame.params.frame_index);
    }

    #[test]
    fn invalidation() {
        let mut target = History::new(1000);

        target.invalidate();

        assert_eq!(HistoryState::Idle, target.state());

        target.set_enabled(true);
        target.advance();
        target.advance();
        target.invalidate();

        let frame = target.advance();

        assert!(frame.clear);
        assert_eq!(0, frame.params.frame_index);
    }
}
