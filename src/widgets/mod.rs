//! Interactive page widgets

mod accordion;
mod nav;

pub use accordion::{Accordion, Card, Height, Panel, PanelState, Transition};
pub use nav::{NavButtonState, NavMenu};
