//! Animated modal lifecycle: Hidden → Visible → Closing → Hidden.
//!
//! # Design
//! - The machine is data only; components schedule the close timer with the returned ticket.
//! - A ticket from an older close is ignored so a reopen during the animation sticks.

/// Default close animation length in milliseconds.
pub const DEFAULT_ANIMATION_MS: u32 = 300;

/// Modal lifecycle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalPhase {
    /// Not rendered (`display: none`).
    #[default]
    Hidden,
    /// Shown.
    Visible,
    /// Close animation running.
    Closing,
}

/// What asked the modal to close.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseTrigger {
    /// Explicit close button or dialog action.
    CloseControl,
    /// Click on the backdrop outside the modal content.
    Backdrop,
    /// Escape key.
    Escape,
}

/// Handle for a scheduled close; pass it back to [`ModalState::finish_close`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloseTicket {
    epoch: u64,
    /// Delay before the modal should be hidden.
    pub delay_ms: u32,
}

/// Modal state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModalState {
    phase: ModalPhase,
    epoch: u64,
    animation_ms: u32,
}

impl Default for ModalState {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_MS)
    }
}

impl ModalState {
    /// Hidden modal with the given close animation length.
    #[must_use]
    pub const fn new(animation_ms: u32) -> Self {
        Self {
            phase: ModalPhase::Hidden,
            epoch: 0,
            animation_ms,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ModalPhase {
        self.phase
    }

    /// Whether the modal occupies the screen (visible or animating out).
    #[must_use]
    pub const fn is_displayed(&self) -> bool {
        !matches!(self.phase, ModalPhase::Hidden)
    }

    /// Show the modal. Reopening during the close animation cancels the close.
    pub const fn open(&mut self) {
        self.phase = ModalPhase::Visible;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Start closing. Returns the ticket to redeem after the animation, or `None`
    /// when the modal is not visible.
    pub const fn request_close(&mut self, _trigger: CloseTrigger) -> Option<CloseTicket> {
        if !matches!(self.phase, ModalPhase::Visible) {
            return None;
        }
        self.phase = ModalPhase::Closing;
        self.epoch = self.epoch.wrapping_add(1);
        Some(CloseTicket {
            epoch: self.epoch,
            delay_ms: self.animation_ms,
        })
    }

    /// Complete a close once its animation has elapsed. Stale tickets are ignored.
    pub const fn finish_close(&mut self, ticket: CloseTicket) -> bool {
        if matches!(self.phase, ModalPhase::Closing) && ticket.epoch == self.epoch {
            self.phase = ModalPhase::Hidden;
            true
        } else {
            false
        }
    }

    /// Map a key press to a close trigger while visible.
    #[must_use]
    pub fn close_trigger_for_key(&self, key: &str) -> Option<CloseTrigger> {
        (self.phase == ModalPhase::Visible && key == "Escape").then_some(CloseTrigger::Escape)
    }

    /// Classes for the modal container.
    #[must_use]
    pub const fn container_classes(&self) -> &'static [&'static str] {
        match self.phase {
            ModalPhase::Hidden => &[],
            ModalPhase::Visible => &["show"],
            ModalPhase::Closing => &["show", "fade-out"],
        }
    }

    /// Classes for the modal content box.
    #[must_use]
    pub const fn content_classes(&self) -> &'static [&'static str] {
        match self.phase {
            ModalPhase::Closing => &["slide-out"],
            ModalPhase::Hidden | ModalPhase::Visible => &[],
        }
    }

    /// Inline style for the container.
    #[must_use]
    pub const fn display_style(&self) -> &'static str {
        match self.phase {
            ModalPhase::Hidden => "display: none;",
            ModalPhase::Visible | ModalPhase::Closing => "display: block;",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_closes_after_animation() {
        let mut modal = ModalState::default();
        modal.open();
        assert_eq!(modal.container_classes(), &["show"]);
        let trigger = modal.close_trigger_for_key("Escape").unwrap();
        let ticket = modal.request_close(trigger).unwrap();
        assert_eq!(ticket.delay_ms, DEFAULT_ANIMATION_MS);
        assert_eq!(modal.phase(), ModalPhase::Closing);
        assert!(modal.container_classes().contains(&"fade-out"));
        assert!(modal.finish_close(ticket));
        assert_eq!(modal.phase(), ModalPhase::Hidden);
        assert_eq!(modal.display_style(), "display: none;");
        assert!(modal.container_classes().is_empty());
        assert!(modal.content_classes().is_empty());
    }

    #[test]
    fn keys_ignored_unless_visible() {
        let mut modal = ModalState::new(150);
        assert!(modal.close_trigger_for_key("Escape").is_none());
        modal.open();
        assert!(modal.close_trigger_for_key("Enter").is_none());
        assert!(modal.request_close(CloseTrigger::Backdrop).is_some());
        assert!(modal.close_trigger_for_key("Escape").is_none());
        assert!(modal.request_close(CloseTrigger::CloseControl).is_none());
    }

    #[test]
    fn reopen_during_close_ignores_stale_ticket() {
        let mut modal = ModalState::default();
        modal.open();
        let ticket = modal.request_close(CloseTrigger::CloseControl).unwrap();
        modal.open();
        assert!(!modal.finish_close(ticket));
        assert_eq!(modal.phase(), ModalPhase::Visible);
    }
}
