use qcmd_common::{Entity, OptionEnum};

use crate::facade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    None,
    Gtk,
    Sdl,
    Curses,
    Cocoa,
    EglHeadless,
}

impl OptionEnum for DisplayType {
    fn as_str(&self) -> &'static str {
        match self {
            DisplayType::None => "none",
            DisplayType::Gtk => "gtk",
            DisplayType::Sdl => "sdl",
            DisplayType::Curses => "curses",
            DisplayType::Cocoa => "cocoa",
            DisplayType::EglHeadless => "egl-headless",
        }
    }
}

/// `-display <type>[,gl=on|off][,full-screen=on|off]`
#[derive(Debug, Clone)]
pub struct Display {
    entity: Entity,
}

impl Display {
    pub fn new(display: DisplayType) -> Self {
        Self {
            entity: Entity::new("display", display.as_str()),
        }
    }

    pub fn gl(mut self, enabled: bool) -> Self {
        self.entity.set_property("gl", enabled);
        self
    }

    pub fn full_screen(mut self, enabled: bool) -> Self {
        self.entity.set_property("full-screen", enabled);
        self
    }

    pub fn show_cursor(mut self, enabled: bool) -> Self {
        self.entity.set_property("show-cursor", enabled);
        self
    }
}

/// `-vnc <display>[,password=on][,websocket=..]`
#[derive(Debug, Clone)]
pub struct Vnc {
    entity: Entity,
}

impl Vnc {
    /// `display` is the VNC display number; `:0` listens on port 5900.
    pub fn new(display: u16) -> Self {
        Self {
            entity: Entity::new("vnc", format!(":{display}")),
        }
    }

    pub fn password(mut self, enabled: bool) -> Self {
        self.entity.set_property("password", enabled);
        self
    }

    pub fn websocket(mut self, port: u16) -> Self {
        self.entity.set_property("websocket", port);
        self
    }
}

facade!(Display, Vnc);
