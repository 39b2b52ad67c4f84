//! Interactive menu controller
//!
//! Drives [`MenuState`] transitions from operator input. Errors raised while
//! handling a device are reported and the menu starts over; only console I/O
//! failures end the loop early.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use super::console::Console;
use super::state::{DeviceAction, MenuChoice, MenuState};
use super::workflow::Workflow;
use crate::driver::traits::DeviceBackend;
use crate::parser::coordinates::{parse_coordinate, Axis, CoordinateError, Coordinates};
use crate::runner::process::ToolRunner;

pub const TITLE: &str = "Welcome to iOS Location Simulator";
pub const GOODBYE: &str = "Exiting program. Goodbye!";

pub struct Menu<B, R, I, O> {
    workflow: Workflow<B, R>,
    console: Console<I, O>,
    /// Shown under the main menu the next time it is drawn
    notice: Option<String>,
}

impl<B, R, I, O> Menu<B, R, I, O>
where
    B: DeviceBackend,
    R: ToolRunner,
    I: BufRead,
    O: Write,
{
    pub fn new(workflow: Workflow<B, R>, console: Console<I, O>) -> Self {
        Self {
            workflow,
            console,
            notice: None,
        }
    }

    pub fn into_console(self) -> Console<I, O> {
        self.console
    }

    /// Run until the operator exits or input is closed
    pub async fn run(&mut self) -> Result<()> {
        let mut state = MenuState::MainMenu;
        while !state.is_terminal() {
            state = match self.step(state).await {
                Ok(next) => next,
                Err(e) if e.downcast_ref::<io::Error>().is_some() => return Err(e),
                Err(e) => {
                    self.console
                        .line(format!("An error occurred: {:#}", e).red())?;
                    self.prompt_retry()?
                }
            };
        }
        self.console.line(GOODBYE)?;
        Ok(())
    }

    /// Perform one transition
    pub async fn step(&mut self, state: MenuState) -> Result<MenuState> {
        match state {
            MenuState::MainMenu => self.main_menu().await,
            MenuState::SelectDevice { devices, action } => {
                self.select_device(&devices, action).await
            }
            MenuState::AwaitCoordinates { udid } => self.await_coordinates(&udid).await,
            MenuState::Help => Ok(self.show_help()?),
            MenuState::Exit => Ok(MenuState::Exit),
        }
    }

    async fn main_menu(&mut self) -> Result<MenuState> {
        self.console.clear()?;
        self.console.line(TITLE.bold().green())?;
        self.console.line("1. Connect a device")?;
        self.console.line("2. Reset Location")?;
        self.console.line("3. Exit")?;
        self.console.line("Type 'help' for instructions.")?;
        if let Some(notice) = self.notice.take() {
            self.console.line(notice.red())?;
        }

        let input = match self.console.prompt("Enter your choice: ")? {
            Some(input) => input,
            None => return Ok(MenuState::Exit),
        };

        match MenuChoice::parse(&input) {
            Some(MenuChoice::Connect) => self.start(DeviceAction::SetLocation).await,
            Some(MenuChoice::Reset) => self.start(DeviceAction::ResetLocation).await,
            Some(MenuChoice::Exit) => Ok(MenuState::Exit),
            Some(MenuChoice::Help) => Ok(MenuState::Help),
            None => {
                self.notice = Some("Invalid choice. Please enter 1, 2, 3 or 'help'.".to_string());
                Ok(MenuState::MainMenu)
            }
        }
    }

    /// Enumerate devices; skip selection when only one is attached
    async fn start(&mut self, action: DeviceAction) -> Result<MenuState> {
        let mut devices = self.workflow.devices().await?;
        match devices.len() {
            0 => {
                self.console
                    .line("No devices connected. Please connect a device.".yellow())?;
                Ok(self.prompt_retry()?)
            }
            1 => {
                let udid = devices.remove(0);
                self.device_selected(udid, action).await
            }
            _ => Ok(MenuState::SelectDevice { devices, action }),
        }
    }

    async fn select_device(
        &mut self,
        devices: &[String],
        action: DeviceAction,
    ) -> Result<MenuState> {
        self.console
            .line("Multiple devices detected. Please select a device:")?;
        for (i, udid) in devices.iter().enumerate() {
            self.console.line(format!("{}. {}", i + 1, udid))?;
        }

        let input = match self
            .console
            .prompt("Enter the number of the desired device: ")?
        {
            Some(input) => input,
            None => return Ok(MenuState::Exit),
        };

        let index = match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= devices.len() => n - 1,
            _ => anyhow::bail!(
                "Invalid device selection '{}'. Enter a number between 1 and {}.",
                input,
                devices.len()
            ),
        };

        self.device_selected(devices[index].clone(), action).await
    }

    async fn device_selected(&mut self, udid: String, action: DeviceAction) -> Result<MenuState> {
        match action {
            DeviceAction::SetLocation => {
                self.workflow
                    .prepare_device(&udid, self.console.output())
                    .await?;
                Ok(MenuState::AwaitCoordinates { udid })
            }
            DeviceAction::ResetLocation => {
                self.workflow
                    .reset_location(&udid, self.console.output())
                    .await?;
                Ok(self.pause_for_menu()?)
            }
        }
    }

    async fn await_coordinates(&mut self, udid: &str) -> Result<MenuState> {
        let latitude = match self
            .read_coordinate("Enter the Latitude (e.g., 37.7749):", Axis::Latitude)?
        {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                self.notice = Some(e.to_string());
                return Ok(MenuState::MainMenu);
            }
            None => return Ok(MenuState::Exit),
        };

        let longitude = match self.read_coordinate(
            "Enter the Longitude (e.g., -122.4194):",
            Axis::Longitude,
        )? {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                self.notice = Some(e.to_string());
                return Ok(MenuState::MainMenu);
            }
            None => return Ok(MenuState::Exit),
        };

        let coordinates = Coordinates::new(latitude, longitude);
        if self
            .workflow
            .set_location(udid, coordinates, self.console.output())
            .await?
        {
            self.console.line(
                format!(
                    "Location set to ({}, {}).",
                    coordinates.latitude, coordinates.longitude
                )
                .green(),
            )?;
        }
        Ok(self.pause_for_menu()?)
    }

    fn read_coordinate(
        &mut self,
        prompt: &str,
        axis: Axis,
    ) -> io::Result<Option<Result<f64, CoordinateError>>> {
        self.console.line(prompt)?;
        Ok(self
            .console
            .read_line()?
            .map(|input| parse_coordinate(&input, axis)))
    }

    fn show_help(&mut self) -> io::Result<MenuState> {
        self.console.clear()?;
        self.console.line("Help Guide:".bold())?;
        self.console
            .line("1 - Connect your iOS device and set a new location.")?;
        self.console
            .line("    iOS 16 devices get the matching Developer Disk Image mounted first.")?;
        self.console
            .line("2 - Reset the device to its real location.")?;
        self.console.line("3 - Exit the program.")?;
        self.console
            .line("Follow the on-screen instructions for each option.")?;
        self.pause_for_menu()
    }

    fn pause_for_menu(&mut self) -> io::Result<MenuState> {
        if self
            .console
            .pause("Press Enter to return to the main menu.")?
        {
            Ok(MenuState::MainMenu)
        } else {
            Ok(MenuState::Exit)
        }
    }

    fn prompt_retry(&mut self) -> io::Result<MenuState> {
        if self.console.pause("Press Enter to try again.")? {
            Ok(MenuState::MainMenu)
        } else {
            Ok(MenuState::Exit)
        }
    }
}
