//! Keyboard zone navigation.

use crate::zones::{HUB, ZONE_IDS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    ToggleHelp,
    JumpTo(usize),
    SelectNext,
    SelectPrevious,
    EnterSelected,
    ReturnToHub,
}

#[inline]
pub fn zone_index_for_digit(key: &str) -> Option<usize> {
    match key {
        "1" => Some(0),
        "2" => Some(1),
        "3" => Some(2),
        "4" => Some(3),
        "5" => Some(4),
        _ => None,
    }
}

#[inline]
pub fn action_for_key(key: &str) -> Option<NavAction> {
    if let Some(i) = zone_index_for_digit(key) {
        return Some(NavAction::JumpTo(i));
    }
    match key {
        "?" | "h" | "H" => Some(NavAction::ToggleHelp),
        "ArrowDown" => Some(NavAction::SelectNext),
        "ArrowUp" => Some(NavAction::SelectPrevious),
        "Enter" => Some(NavAction::EnterSelected),
        "Escape" => Some(NavAction::ReturnToHub),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    Help(bool),
    Selected(usize),
    Entered(&'static str),
    Hub,
}

#[derive(Clone, Debug)]
pub struct ZoneNavigator {
    selected: usize,
    help_visible: bool,
    active: &'static str,
}

impl Default for ZoneNavigator {
    fn default() -> Self {
        Self {
            selected: 0,
            help_visible: false,
            active: HUB,
        }
    }
}

impl ZoneNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn active_zone(&self) -> &'static str {
        self.active
    }

    pub fn handle_key(&mut self, key: &str) -> Option<NavOutcome> {
        action_for_key(key).map(|a| self.apply(a))
    }

    pub fn apply(&mut self, action: NavAction) -> NavOutcome {
        let n = ZONE_IDS.len();
        match action {
            NavAction::ToggleHelp => {
                self.help_visible = !self.help_visible;
                NavOutcome::Help(self.help_visible)
            }
            NavAction::JumpTo(i) => self.enter(i.min(n - 1)),
            NavAction::SelectNext => {
                self.selected = (self.selected + 1) % n;
                NavOutcome::Selected(self.selected)
            }
            NavAction::SelectPrevious => {
                self.selected = (self.selected + n - 1) % n;
                NavOutcome::Selected(self.selected)
            }
            NavAction::EnterSelected => self.enter(self.selected),
            NavAction::ReturnToHub => {
                self.active = HUB;
                NavOutcome::Hub
            }
        }
    }

    fn enter(&mut self, index: usize) -> NavOutcome {
        self.selected = index;
        self.active = ZONE_IDS[index];
        log::info!("[keys] entering zone {}", self.active);
        NavOutcome::Entered(self.active)
    }
}
