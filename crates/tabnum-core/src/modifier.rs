//! Jump-modifier tracking.
//!
//! Badges are shown while Ctrl or Meta (the tab-jump modifier) is held.
//! The host forwards raw key-down/key-up events; [`ModifierState`] turns
//! them into at most one transition per press.
//!
//! - key-down (press or repeat) with Ctrl or Meta held, while released:
//!   [`ModifierTransition::Pressed`]
//! - key-up with neither Ctrl nor Meta held, while pressed:
//!   [`ModifierTransition::Released`]
//!
//! Everything else is ignored, so auto-repeat and unrelated keys pressed
//! while the modifier is held do not flicker the badges.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl Modifiers {
    /// Modifiers that drive badge visibility.
    pub const JUMP: Self = Self::CTRL.union(Self::SUPER);

    /// Whether the jump modifier is part of this set.
    #[must_use]
    pub const fn holds_jump(self) -> bool {
        self.intersects(Self::JUMP)
    }
}

/// Key event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed.
    #[default]
    Press,
    /// Key is auto-repeating.
    Repeat,
    /// Key was released.
    Release,
}

/// A key event as delivered by the host.
///
/// `modifiers` reflects the modifier state *after* the event, the way
/// browser key events report it: releasing Ctrl yields a key-up without
/// [`Modifiers::CTRL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Key-down with the given modifiers.
    #[must_use]
    pub const fn down(modifiers: Modifiers) -> Self {
        Self {
            kind: KeyEventKind::Press,
            modifiers,
        }
    }

    /// Key-up with the given modifiers.
    #[must_use]
    pub const fn up(modifiers: Modifiers) -> Self {
        Self {
            kind: KeyEventKind::Release,
            modifiers,
        }
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Change in the held state of the jump modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTransition {
    Pressed,
    Released,
}

/// Whether the jump modifier is currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    held: bool,
}

impl ModifierState {
    #[must_use]
    pub const fn new() -> Self {
        Self { held: false }
    }

    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Feed one key event; returns the transition it caused, if any.
    pub fn feed(&mut self, event: &KeyEvent) -> Option<ModifierTransition> {
        let jump = event.modifiers.holds_jump();
        if event.is_down() && jump && !self.held {
            self.held = true;
            Some(ModifierTransition::Pressed)
        } else if !event.is_down() && !jump && self.held {
            self.held = false;
            Some(ModifierTransition::Released)
        } else {
            None
        }
    }

    /// Forget the held state (listeners detached).
    pub fn reset(&mut self) {
        self.held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_down_then_up() {
        let mut state = ModifierState::new();
        assert_eq!(
            state.feed(&KeyEvent::down(Modifiers::CTRL)),
            Some(ModifierTransition::Pressed)
        );
        assert!(state.is_held());
        assert_eq!(
            state.feed(&KeyEvent::up(Modifiers::NONE)),
            Some(ModifierTransition::Released)
        );
        assert!(!state.is_held());
    }

    #[test]
    fn meta_counts_as_jump_modifier() {
        let mut state = ModifierState::new();
        assert_eq!(
            state.feed(&KeyEvent::down(Modifiers::SUPER)),
            Some(ModifierTransition::Pressed)
        );
    }

    #[test]
    fn repeat_while_held_is_ignored() {
        let mut state = ModifierState::new();
        state.feed(&KeyEvent::down(Modifiers::CTRL));
        let repeat = KeyEvent::down(Modifiers::CTRL).with_kind(KeyEventKind::Repeat);
        assert_eq!(state.feed(&repeat), None);
        assert!(state.is_held());
    }

    #[test]
    fn releasing_other_key_while_ctrl_held_keeps_state() {
        let mut state = ModifierState::new();
        state.feed(&KeyEvent::down(Modifiers::CTRL));
        // e.g. releasing "3" of Ctrl+3 while Ctrl stays down
        assert_eq!(state.feed(&KeyEvent::up(Modifiers::CTRL)), None);
        assert!(state.is_held());
    }

    #[test]
    fn shift_and_alt_do_not_press() {
        let mut state = ModifierState::new();
        assert_eq!(state.feed(&KeyEvent::down(Modifiers::SHIFT | Modifiers::ALT)), None);
        assert!(!state.is_held());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = ModifierState::new();
        assert_eq!(state.feed(&KeyEvent::up(Modifiers::NONE)), None);
    }

    #[test]
    fn reset_clears_held() {
        let mut state = ModifierState::new();
        state.feed(&KeyEvent::down(Modifiers::CTRL | Modifiers::SHIFT));
        state.reset();
        assert!(!state.is_held());
    }
}
