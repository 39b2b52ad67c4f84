/// Main menu input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// `1`: pick a device and set its location
    Connect,
    /// `2`: pick a device and reset its location
    Reset,
    /// `3`
    Exit,
    /// `help`
    Help,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Connect),
            "2" => Some(MenuChoice::Reset),
            "3" => Some(MenuChoice::Exit),
            s if s.eq_ignore_ascii_case("help") => Some(MenuChoice::Help),
            _ => None,
        }
    }
}

/// What to do once a device has been chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    SetLocation,
    ResetLocation,
}

/// Menu controller states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    SelectDevice {
        devices: Vec<String>,
        action: DeviceAction,
    },
    AwaitCoordinates {
        udid: String,
    },
    Help,
    Exit,
}

impl MenuState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MenuState::Exit)
    }
}
