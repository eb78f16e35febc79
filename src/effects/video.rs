//! Video sound toggle
//!
//! Videos autoplay muted. Each has a sound button; at most one video in the
//! group plays with sound at a time.

pub const BUTTON_SELECTOR: &str = ".video-sound-btn";
pub const WRAPPER_SELECTOR: &str = ".video-wrapper";
pub const ICON_MUTED: &str = "fas fa-volume-xmark";
pub const ICON_UNMUTED: &str = "fas fa-volume-high";
/// Button class while its video has sound
pub const UNMUTED_CLASS: &str = "unmuted";
pub const MUTED_LABEL: &str = "Tap to unmute";

/// How a sound button should look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLook {
    pub icon: &'static str,
    pub unmuted_class: bool,
    /// New label text, None leaves the label alone
    pub label: Option<&'static str>,
}

impl ButtonLook {
    pub const MUTED: Self = Self {
        icon: ICON_MUTED,
        unmuted_class: false,
        label: Some(MUTED_LABEL),
    };

    pub const UNMUTED: Self = Self {
        icon: ICON_UNMUTED,
        unmuted_class: true,
        label: None,
    };
}

/// A change to apply to video `index` and its button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoUpdate {
    pub index: usize,
    pub muted: bool,
    pub look: ButtonLook,
}

/// Mute state of a group of videos
#[derive(Debug, Clone)]
pub struct SoundGroup {
    muted: Vec<bool>,
}

impl SoundGroup {
    /// Group with every video muted
    pub fn new(len: usize) -> Self {
        Self {
            muted: vec![true; len],
        }
    }

    pub fn len(&self) -> usize {
        self.muted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.muted.is_empty()
    }

    /// Record the real mute state of a video (native controls can change it)
    pub fn sync(&mut self, index: usize, muted: bool) {
        if let Some(m) = self.muted.get_mut(index) {
            *m = muted;
        }
    }

    pub fn is_muted(&self, index: usize) -> bool {
        self.muted.get(index).copied().unwrap_or(true)
    }

    /// Index of the video playing with sound, if any
    pub fn unmuted(&self) -> Option<usize> {
        self.muted.iter().position(|m| !m)
    }

    /// Handle a click on video `index`'s sound button.
    ///
    /// Unmuting mutes every other video first. Muting only touches `index`.
    pub fn toggle(&mut self, index: usize) -> Vec<VideoUpdate> {
        if index >= self.muted.len() {
            return Vec::new();
        }

        if !self.muted[index] {
            self.muted[index] = true;
            return vec![VideoUpdate {
                index,
                muted: true,
                look: ButtonLook::MUTED,
            }];
        }

        let mut updates = Vec::with_capacity(self.muted.len());
        for (i, muted) in self.muted.iter_mut().enumerate() {
            if i != index {
                *muted = true;
                updates.push(VideoUpdate {
                    index: i,
                    muted: true,
                    look: ButtonLook::MUTED,
                });
            }
        }
        self.muted[index] = false;
        updates.push(VideoUpdate {
            index,
            muted: false,
            look: ButtonLook::UNMUTED,
        });
        updates
    }
}
